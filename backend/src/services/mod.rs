//! Business logic services.

pub mod market_data;
