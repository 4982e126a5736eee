use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::{Asset, RateError, RateProvider};

/// Spot price lookups against the Binance public `ticker/price` endpoint.
pub struct BinanceProvider {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceProvider {
    pub fn new(base_url: &str) -> Result<Self, RateError> {
        let client = reqwest::Client::builder()
            .user_agent("coinconv/0.1")
            .build()?;
        Ok(BinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn ticker_url(&self, symbol: &str) -> String {
        format!("{}/api/v3/ticker/price?symbol={}", self.base_url, symbol)
    }
}

#[derive(Debug, Deserialize)]
struct TickerPriceResponse {
    price: PriceField,
}

// Binance sends prices as decimal strings; plain numbers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceField {
    Number(f64),
    Text(String),
}

impl PriceField {
    fn value(&self) -> Option<f64> {
        let price = match self {
            PriceField::Number(n) => *n,
            PriceField::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        (price.is_finite() && price > 0.0).then_some(price)
    }
}

#[async_trait]
impl RateProvider for BinanceProvider {
    #[instrument(name = "BinanceRateFetch", skip(self), fields(from = %from, to = %to))]
    async fn get_rate(&self, from: Asset, to: Asset) -> Result<f64, RateError> {
        if from == to {
            return Ok(1.0);
        }

        let symbol = Asset::quote_symbol(from, to)?;
        let url = self.ticker_url(&symbol);
        debug!("Requesting ticker price from {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            RateError::Network(format!("Request error: {e} for symbol: {symbol}"))
        })?;

        if !response.status().is_success() {
            return Err(RateError::Network(format!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            )));
        }

        let text = response.text().await?;
        let data: TickerPriceResponse = serde_json::from_str(&text).map_err(|e| {
            RateError::Network(format!("Failed to parse JSON response for {symbol}: {e}"))
        })?;

        let price = data
            .price
            .value()
            .ok_or_else(|| RateError::Network(format!("Invalid price for symbol: {symbol}")))?;
        debug!(price, "Received ticker price");
        Ok(price)
    }
}
