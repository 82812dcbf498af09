//! Authenticated-user extractor.
//!
//! Provides an Axum extractor for handlers behind `require_user_auth`,
//! falling back to validating the Bearer token directly when the
//! middleware has not run.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth;

/// The authenticated user of the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
}

impl From<UserAuth> for CurrentUser {
    fn from(auth: UserAuth) -> Self {
        Self {
            user_id: auth.user_id,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Auth info inserted by the middleware, if it ran.
        if let Some(auth) = parts.extensions.get::<UserAuth>() {
            return Ok(auth.clone().into());
        }

        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        if !auth_header.starts_with("Bearer ") {
            return Err(ApiError::Unauthorized(
                "Invalid Authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];
        let jwt_config = UserAuth::create_jwt_config(&state.config.jwt);

        let auth = UserAuth::validate(&jwt_config, token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(auth.into())
    }
}
