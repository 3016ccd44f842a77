//! SeaORM entities.

pub mod resource;
pub mod team;
pub mod user;
