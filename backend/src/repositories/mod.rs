//! Database repositories.
//!
//! Each repository owns the persistence operations for one entity.

pub mod user_repository;
