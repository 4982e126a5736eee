use super::ui;
use crate::controller::{Action, ConversionController, ConversionState};
use crate::core::RateProvider;
use crate::core::config::ConversionDefaults;
use anyhow::Result;
use std::sync::Arc;

/// One-shot conversion: mounts a controller with `initial`, optionally swaps
/// the two sides, and prints the result.
pub async fn run(
    provider: Arc<dyn RateProvider>,
    initial: &ConversionDefaults,
    swap: bool,
) -> Result<ConversionState> {
    let mut controller = ConversionController::new(provider, initial);

    let spinner = ui::new_spinner("Fetching exchange rate...");
    controller.mount().await;
    if swap {
        controller.dispatch(Action::Swap).await;
    }
    spinner.finish_and_clear();

    let state = controller.state().clone();
    println!(
        "{}",
        ui::render_conversion(&state, controller.rate_text().as_deref())
    );

    if state.error {
        anyhow::bail!(
            "Failed to fetch exchange rate for {}/{}",
            state.from_asset,
            state.to_asset
        );
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Asset, RateError};
    use async_trait::async_trait;

    struct FixedProvider(Result<f64, RateError>);

    #[async_trait]
    impl RateProvider for FixedProvider {
        async fn get_rate(&self, from: Asset, to: Asset) -> Result<f64, RateError> {
            if from == to {
                return Ok(1.0);
            }
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_convert_with_swap() {
        let initial = ConversionDefaults {
            from: Asset::Btc,
            to: Asset::Usdt,
            amount: Some(2.0),
        };

        let state = run(Arc::new(FixedProvider(Ok(65000.0))), &initial, true)
            .await
            .unwrap();

        assert_eq!(state.from_asset, Asset::Usdt);
        assert_eq!(state.to_asset, Asset::Btc);
        assert_eq!(state.from_value, Some(130000.0));
        assert_eq!(state.to_value, Some(2.0));
    }

    #[tokio::test]
    async fn test_convert_reports_fetch_failure() {
        let provider = FixedProvider(Err(RateError::Network("HTTP error: 418".to_string())));

        let result = run(Arc::new(provider), &ConversionDefaults::default(), false).await;

        assert_eq!(
            result.unwrap_err().to_string(),
            "Failed to fetch exchange rate for BTC/USDT"
        );
    }
}
