//! Application services.

pub mod auth;
pub mod metadata;

pub use auth::AuthService;
pub use metadata::{MetadataError, MetadataFetcher};
