//! Core business logic abstractions

pub mod asset;
pub mod config;
pub mod conversion;
pub mod error;
pub mod log;
pub mod rate;

// Re-export main types for cleaner imports
pub use asset::{Asset, Side};
pub use error::RateError;
pub use rate::RateProvider;
