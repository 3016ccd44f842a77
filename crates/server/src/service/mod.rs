//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and the repositories. They depend on
//! repository traits so every service can be tested against mocks.

mod auth_service;
pub mod container;
mod resource_service;
mod team_service;
mod user_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, Claims, LoginOutcome, TokenResponse};
pub use resource_service::{ResourceManager, ResourceService};
pub use team_service::{NewTeam, TeamChanges, TeamManager, TeamService};
pub use user_service::{NewUser, UserChanges, UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use resource_service::MockResourceService;
#[cfg(any(test, feature = "test-utils"))]
pub use team_service::MockTeamService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
