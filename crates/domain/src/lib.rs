//! Domain layer for the Giftwish backend.
//!
//! This crate contains:
//! - Domain models (User, Wishlist, Item, Reservation, Contribution)
//! - The realtime event contract pushed to wishlist subscribers
//! - Business logic services (funding engine, gifting state machine,
//!   realtime channel registry)

pub mod models;
pub mod services;
