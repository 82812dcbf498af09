//! URL metadata extraction endpoint.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use validator::Validate;

use domain::models::UrlMetadata;

use crate::app::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/url/parse", post(parse_url))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ParseUrlRequest {
    #[validate(url(message = "must be a valid URL"))]
    url: String,
}

/// Fetch a product page and return its extracted metadata for form
/// pre-fill.
async fn parse_url(
    State(state): State<AppState>,
    Json(payload): Json<ParseUrlRequest>,
) -> Result<Json<UrlMetadata>, ApiError> {
    payload.validate()?;
    let metadata = state.metadata.fetch(&payload.url).await?;
    Ok(Json(metadata))
}
