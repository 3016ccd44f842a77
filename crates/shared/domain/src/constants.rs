//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_STAFF: &str = "staff";

/// Administrator role
pub const ROLE_ADMIN: &str = "admin";

/// Super administrator role, bypasses team permission checks
pub const ROLE_SUPERADMIN: &str = "superadmin";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in days
pub const DEFAULT_JWT_EXPIRATION_DAYS: i64 = 30;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per day (for token expiration calculation)
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// Resources
// =============================================================================

/// Query value that disables a collection's default filter
pub const FILTER_ALL: &str = "all";

/// Query parameter carrying free-text search
pub const SEARCH_PARAM: &str = "search";
