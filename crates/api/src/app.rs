//! Application state and router assembly.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, middleware as axum_middleware, Router};
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use domain::services::ChannelRegistry;

use crate::config::Config;
use crate::middleware::{require_user_auth, security_headers_middleware, trace_id};
use crate::routes;
use crate::services::MetadataFetcher;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// Per-wishlist realtime fan-out channels.
    pub registry: Arc<ChannelRegistry>,
    pub metadata: MetadataFetcher,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        let metadata = MetadataFetcher::new(&config.metadata);
        Self {
            pool,
            config: Arc::new(config),
            registry: Arc::new(ChannelRegistry::new()),
            metadata,
        }
    }
}

/// Builds the complete application router.
pub fn create_app(config: Config, pool: PgPool) -> Router {
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);
    let cors = build_cors_layer(&config.security.cors_origins);
    let state = AppState::new(config, pool);

    // Guest-facing surface: no authentication, identified by slug or
    // reservation credential.
    let public_routes = Router::new()
        .merge(routes::health::router())
        .merge(routes::wishlists::public_router())
        .merge(routes::items::guest_router())
        .merge(routes::ws::router())
        .merge(routes::metadata::router())
        .merge(routes::auth::router());

    // Owner surface behind JWT auth.
    let owner_routes = Router::new()
        .merge(routes::auth::me_router())
        .merge(routes::wishlists::owner_router())
        .merge(routes::items::owner_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(owner_routes)
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(axum_middleware::from_fn(trace_id))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        warn!("No CORS origins configured, allowing any origin");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}
