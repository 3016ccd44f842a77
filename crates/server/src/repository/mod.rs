//! Repository layer for data access.

pub mod entities;
mod resource_repository;
mod team_repository;
mod user_repository;

pub use resource_repository::{ResourceRepository, ResourceStore};
pub use team_repository::{TeamRepository, TeamStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use resource_repository::MockResourceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use team_repository::MockTeamRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
