//! Shared utilities and common types for the Giftwish backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT token generation and validation
//! - Password hashing with Argon2id
//! - URL-safe slug generation for shareable wishlist links
//! - Common validation logic

pub mod jwt;
pub mod password;
pub mod slug;
pub mod validation;
