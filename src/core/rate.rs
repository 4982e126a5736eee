//! Exchange rate abstraction

use async_trait::async_trait;

use super::asset::Asset;
use super::error::RateError;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Price of one unit of the pair's base asset in its quote asset, or `1.0`
    /// when `from` and `to` are the same asset.
    async fn get_rate(&self, from: Asset, to: Asset) -> Result<f64, RateError>;
}
