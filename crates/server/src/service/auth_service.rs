//! Authentication service - registration, login and token verification.
//!
//! Uses the domain Password value object for hashing.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use common::{AppError, AppResult, JwtConfig};
use domain::{normalize_email, Password, Role, User, SECONDS_PER_DAY, TOKEN_TYPE_BEARER};

use crate::repository::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Verified against when the email is unknown so both paths cost one argon2 run.
const DUMMY_PASSWORD: &str = "timing-equalizer-password";

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token part of a successful login
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token
    pub token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// A logged-in user together with the issued token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: TokenResponse,
}

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new staff user without a team
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User>;

    /// Check credentials, record the login and issue a token
    async fn login(&self, email: String, password: String) -> AppResult<LoginOutcome>;

    /// Verify JWT signature and expiry and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService backed by the user repository.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    jwt: JwtConfig,
    dummy: Password,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtConfig) -> Self {
        let dummy = Password::new(DUMMY_PASSWORD)
            .unwrap_or_else(|_| Password::from_hash(String::new()));
        Self { users, jwt, dummy }
    }

    fn secret(&self) -> &[u8] {
        self.jwt.secret.as_bytes()
    }

    /// Generate JWT token for a user
    fn generate_token(&self, user: &User) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::days(self.jwt.expiration_days);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret()),
        )?;

        Ok(TokenResponse {
            token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.jwt.expiration_days * SECONDS_PER_DAY,
        })
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User> {
        let email = normalize_email(&email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User with this email"));
        }

        let password = Password::new(&password)?;
        let user = User::new(&name, &email, password, Role::Staff)?;

        let user = self.users.insert(&user).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<LoginOutcome> {
        let email = normalize_email(&email);
        let found = self.users.find_by_email(&email).await?;

        // Verify even when the user is missing so response time does not reveal
        // which emails are registered.
        let stored = found.as_ref().map(|u| &u.password).unwrap_or(&self.dummy);
        let password_valid = stored.verify(&password);

        let mut user = match found {
            Some(user) if password_valid => user,
            _ => {
                tracing::warn!(email = %email, "Rejected login attempt");
                return Err(AppError::InvalidCredentials);
            }
        };

        user.record_login();
        let user = self.users.update(&user).await?;
        let token = self.generate_token(&user)?;

        Ok(LoginOutcome { user, token })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}
