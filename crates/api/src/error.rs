use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use domain::services::GiftingError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Contribution would exceed item price. Remaining: {remaining}")]
    ExceedsLimit { remaining: Decimal },

    #[error("Blocked: {0}")]
    Blocked(String),

    #[error("Upstream timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining: Option<Decimal>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::InvalidState(msg) => (StatusCode::BAD_REQUEST, "invalid_state", msg.clone()),
            ApiError::ExceedsLimit { .. } => {
                (StatusCode::BAD_REQUEST, "exceeds_limit", self.to_string())
            }
            ApiError::Blocked(msg) => (StatusCode::BAD_REQUEST, "blocked", msg.clone()),
            ApiError::Timeout(msg) => (StatusCode::REQUEST_TIMEOUT, "timeout", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        // Clients topping up a pool get the remaining amount as data,
        // not just prose.
        let remaining = match &self {
            ApiError::ExceedsLimit { remaining } => Some(*remaining),
            _ => None,
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            remaining,
        };

        (status, Json(body)).into_response()
    }
}

impl From<GiftingError> for ApiError {
    fn from(err: GiftingError) -> Self {
        match err {
            GiftingError::NotFound(_) => ApiError::NotFound(err.to_string()),
            GiftingError::Forbidden => ApiError::Forbidden(err.to_string()),
            GiftingError::AlreadyReserved => ApiError::Conflict(err.to_string()),
            GiftingError::InvalidState(_) => ApiError::InvalidState(err.to_string()),
            GiftingError::ExceedsLimit { remaining } => ApiError::ExceedsLimit { remaining },
            GiftingError::Blocked { .. } => ApiError::Blocked(err.to_string()),
            GiftingError::Database(db_err) => ApiError::from(db_err),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::Conflict("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message.clone().map(|m| m.to_string()).unwrap_or_default()
                    )
                })
            })
            .collect();

        ApiError::Validation(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use rust_decimal_macros::dec;

    #[test]
    fn test_not_found_status() {
        let response = ApiError::NotFound("item".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_forbidden_status() {
        let response = ApiError::Forbidden("private".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_conflict_status() {
        let response = ApiError::Conflict("reserved".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_state_maps_to_bad_request() {
        let response = ApiError::InvalidState("no pooling".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_exceeds_limit_maps_to_bad_request() {
        let response = ApiError::ExceedsLimit { remaining: dec!(30) }.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_exceeds_limit_body_carries_remaining() {
        let response = ApiError::ExceedsLimit { remaining: dec!(30) }.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"], "exceeds_limit");
        assert_eq!(body["remaining"].as_f64().unwrap(), 30.0);
    }

    #[tokio::test]
    async fn test_other_errors_omit_remaining() {
        let response = ApiError::Conflict("reserved".to_string()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert!(body.get("remaining").is_none());
    }

    #[test]
    fn test_blocked_maps_to_bad_request() {
        let response = ApiError::Blocked("pooled funds".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_timeout_status() {
        let response = ApiError::Timeout("fetch".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_internal_hides_detail() {
        let response = ApiError::Internal("secret detail".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_gifting_error_mapping() {
        let api: ApiError = GiftingError::AlreadyReserved.into();
        assert!(matches!(api, ApiError::Conflict(_)));

        let api: ApiError = GiftingError::Forbidden.into();
        assert!(matches!(api, ApiError::Forbidden(_)));

        let api: ApiError = GiftingError::NotFound("Item").into();
        assert!(matches!(api, ApiError::NotFound(_)));

        let api: ApiError = GiftingError::ExceedsLimit { remaining: dec!(30) }.into();
        match &api {
            ApiError::ExceedsLimit { remaining } => assert_eq!(*remaining, dec!(30)),
            other => panic!("Expected ExceedsLimit, got {:?}", other),
        }

        let api: ApiError = GiftingError::Blocked {
            count: 2,
            total: dec!(45),
        }
        .into();
        assert!(matches!(api, ApiError::Blocked(_)));
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, ApiError::NotFound(_)));
    }
}
