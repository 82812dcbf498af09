//! User registration and login.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use domain::models::User;
use persistence::repositories::UserRepository;
use shared::jwt::JwtConfig;
use shared::password::{hash_password, verify_password};

use crate::config::JwtAuthConfig;
use crate::error::ApiError;

/// Service handling account creation and credential checks.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt_config: &JwtAuthConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt: JwtConfig::new(&jwt_config.secret, jwt_config.access_token_expiry_secs),
        }
    }

    /// Create a new account with a hashed password and issue its first
    /// access token.
    ///
    /// Email and username must both be unused.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<(User, String), ApiError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(ApiError::Conflict("Email already registered".into()));
        }
        if self.users.find_by_username(username).await?.is_some() {
            return Err(ApiError::Conflict("Username already taken".into()));
        }

        let hash = hash_password(password)
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = self.users.create(email, username, &hash).await?;
        let token = self
            .jwt
            .generate_token(&user.id.to_string())
            .map_err(|e| ApiError::Internal(format!("Token generation failed: {}", e)))?;

        info!(user_id = %user.id, "user registered");
        Ok((user.into(), token))
    }

    /// Verify credentials and issue an access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), ApiError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;

        let verified = verify_password(password, hash)
            .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;
        if !verified {
            return Err(ApiError::Unauthorized("Invalid email or password".into()));
        }
        if !user.is_active {
            return Err(ApiError::Unauthorized("Account is disabled".into()));
        }

        let token = self
            .jwt
            .generate_token(&user.id.to_string())
            .map_err(|e| ApiError::Internal(format!("Token generation failed: {}", e)))?;

        info!(user_id = %user.id, "user logged in");
        Ok((user.into(), token))
    }

    /// Load the account behind an authenticated request.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
        Ok(user.into())
    }
}
