//! CLI command implementations.

pub mod create_admin;
pub mod migrate;
pub mod serve;
