//! User JWT authentication middleware.
//!
//! Provides middleware for requiring JWT-based user authentication on
//! owner-facing routes.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use shared::jwt::JwtConfig;

/// Authenticated user information extracted from JWT.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
}

impl UserAuth {
    /// Validates an access token and returns user authentication info.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token".to_string())?;

        Ok(UserAuth { user_id })
    }

    /// Creates a JwtConfig from the application JWT settings.
    pub fn create_jwt_config(config: &JwtAuthConfig) -> JwtConfig {
        JwtConfig::new(&config.secret, config.access_token_expiry_secs)
    }
}

/// Middleware that requires JWT user authentication.
///
/// Validates the Bearer token in the Authorization header and rejects
/// requests without a valid JWT. Authenticated user information is stored
/// in request extensions for downstream handlers.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    let jwt_config = UserAuth::create_jwt_config(&state.config.jwt);

    match UserAuth::validate(&jwt_config, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config() -> JwtConfig {
        JwtConfig::new("unit-test-secret", 3600)
    }

    #[test]
    fn test_validate_accepts_valid_token() {
        let config = jwt_config();
        let user_id = Uuid::new_v4();
        let token = config.generate_token(&user_id.to_string()).unwrap();

        let auth = UserAuth::validate(&config, &token).unwrap();
        assert_eq!(auth.user_id, user_id);
    }

    #[test]
    fn test_validate_rejects_non_uuid_subject() {
        let config = jwt_config();
        let token = config.generate_token("not-a-uuid").unwrap();
        assert!(UserAuth::validate(&config, &token).is_err());
    }

    #[test]
    fn test_validate_rejects_garbage_token() {
        let config = jwt_config();
        assert!(UserAuth::validate(&config, "garbage").is_err());
    }
}
