//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod indicator_helpers;
pub mod snapshot;
pub mod universe;
pub mod country;
pub mod market;
pub mod screen;
pub mod table;
pub mod config_validation;
pub mod error;
