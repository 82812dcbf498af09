//! HTTP route handlers.

pub mod auth;
pub mod health;
pub mod items;
pub mod metadata;
pub mod wishlists;
pub mod ws;
