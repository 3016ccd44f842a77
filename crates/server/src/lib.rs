//! Consultancy CMS server.
//!
//! Authenticated admin API for users and teams plus a generic CRUD surface
//! over the content and lead collections described by `domain::catalog`.
//!
//! # Layers
//!
//! - **cli** / **commands**: command-line entry points
//! - **handlers**, **middleware**, **extractors**, **routes**: HTTP surface
//! - **service**: use cases over repository traits
//! - **repository**: sea-orm entities and stores
//! - **infra**: connection pool and migrations

pub mod cli;
pub mod commands;
pub mod config;
pub mod extractors;
pub mod handlers;
pub mod infra;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;
pub mod types;

pub use config::{ConfigError, ServerConfig};
pub use routes::create_router;
pub use state::AppState;
