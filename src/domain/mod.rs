//! Core domain types and logic.

pub mod trade;
pub mod normalize;
pub mod metrics;
pub mod load_state;
pub mod settings;
pub mod config_validation;
pub mod error;
