//! Errors surfaced by rate providers

use thiserror::Error;

use super::asset::Asset;

/// Failure of a single rate lookup.
///
/// Cloneable so that every caller coalesced into one debounced request can
/// receive the same outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid asset pair: {from}/{to} has no quotable base")]
    InvalidPair { from: Asset, to: Asset },
}

impl From<reqwest::Error> for RateError {
    fn from(e: reqwest::Error) -> Self {
        RateError::Network(e.to_string())
    }
}
