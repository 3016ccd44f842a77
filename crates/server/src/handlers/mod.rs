//! HTTP request handlers.

pub mod auth_handler;
pub mod health_handler;
pub mod resource_handler;
pub mod team_handler;
pub mod user_handler;

pub use auth_handler::{auth_routes, me_routes};
pub use health_handler::health;
pub use resource_handler::resource_routes;
pub use team_handler::team_routes;
pub use user_handler::user_routes;

pub(crate) use domain::parse_id;

use serde::{Deserialize, Deserializer};

/// Distinguish an explicit `null` (`Some(None)`) from an absent field (`None`).
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
