//! Persistence layer for the Giftwish backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the transactional funding
//!   discipline for pooled contributions

pub mod db;
pub mod entities;
pub mod repositories;
