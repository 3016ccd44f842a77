//! Command-line interface.
//!
//! - `serve` starts the HTTP server
//! - `migrate` manages the database schema
//! - `create-admin` provisions the first administrator

pub mod args;

pub use args::{Cli, Commands};
