//! Line driven converter.
//!
//! Input is read while rate requests run in the background, so quick edits
//! pile up in the debounce window instead of blocking the prompt. Outcomes of
//! superseded requests are dropped by the controller.

use super::ui;
use crate::controller::{Action, ConversionController, ConversionState, RefreshTicket};
use crate::core::{Asset, RateError, RateProvider, Side};
use anyhow::{Context, Result, anyhow};
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::debug;

const HELP: &str = "Commands: amount [VALUE] | target [VALUE] | from ASSET | to ASSET | swap | refresh | show | quit";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Action(Action),
    Show,
    Quit,
}

fn parse_amount(arg: Option<&str>) -> Result<Option<f64>> {
    arg.map(|v| {
        v.parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
            .ok_or_else(|| anyhow!("Invalid amount: {v}"))
    })
    .transpose()
}

fn parse_asset(arg: Option<&str>) -> Result<Asset> {
    arg.ok_or_else(|| anyhow!("Missing asset, expected one of BTC, USDT, ETH"))?
        .parse()
}

impl FromStr for Input {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let command = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        let input = match command.as_str() {
            "amount" => Input::Action(Action::SetFromValue(parse_amount(arg)?)),
            "target" => Input::Action(Action::SetToValue(parse_amount(arg)?)),
            "from" => Input::Action(Action::SelectAsset(Side::From, parse_asset(arg)?)),
            "to" => Input::Action(Action::SelectAsset(Side::To, parse_asset(arg)?)),
            "swap" => Input::Action(Action::Swap),
            "refresh" => Input::Action(Action::RefreshRate),
            "show" | "" => Input::Show,
            "quit" | "exit" => Input::Quit,
            other => return Err(anyhow!("Unknown command: {other}")),
        };
        Ok(input)
    }
}

type FetchOutcome = (RefreshTicket, Result<f64, RateError>);

fn spawn_fetch(
    inflight: &mut JoinSet<FetchOutcome>,
    provider: Arc<dyn RateProvider>,
    ticket: RefreshTicket,
) {
    inflight.spawn(async move {
        let result = provider.get_rate(ticket.from, ticket.to).await;
        (ticket, result)
    });
}

fn render(controller: &ConversionController) {
    println!(
        "{}",
        ui::render_conversion(controller.state(), controller.rate_text().as_deref())
    );
}

/// Runs the converter until `quit` or end of input and returns the final
/// state. At end of input, pending requests are awaited first.
pub async fn run<R>(mut controller: ConversionController, reader: R) -> Result<ConversionState>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut inflight = JoinSet::new();

    println!("{}", ui::style_text(HELP, ui::StyleType::Subtle));
    if let Some(ticket) = controller.apply(Action::RefreshRate) {
        spawn_fetch(&mut inflight, controller.provider(), ticket);
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match line.parse::<Input>() {
                    Ok(Input::Quit) => {
                        inflight.abort_all();
                        return Ok(controller.state().clone());
                    }
                    Ok(Input::Show) => render(&controller),
                    Ok(Input::Action(action)) => match controller.apply(action) {
                        Some(ticket) => spawn_fetch(&mut inflight, controller.provider(), ticket),
                        None => render(&controller),
                    },
                    Err(e) => eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
                }
            }
            Some(joined) = inflight.join_next(), if !inflight.is_empty() => {
                let (ticket, result) = joined.context("Rate request task failed")?;
                if controller.complete_refresh(ticket, result) {
                    render(&controller);
                }
            }
        }
    }

    debug!(pending = inflight.len(), "End of input, awaiting pending requests");
    while let Some(joined) = inflight.join_next().await {
        let (ticket, result) = joined.context("Rate request task failed")?;
        controller.complete_refresh(ticket, result);
    }
    render(&controller);
    Ok(controller.state().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConversionDefaults;
    use crate::providers::DebouncedRateProvider;
    use async_trait::async_trait;
    use std::time::Duration;

    #[test]
    fn test_parse_input() {
        assert_eq!(
            "amount 2.5".parse::<Input>().unwrap(),
            Input::Action(Action::SetFromValue(Some(2.5)))
        );
        assert_eq!(
            "amount".parse::<Input>().unwrap(),
            Input::Action(Action::SetFromValue(None))
        );
        assert_eq!(
            "TO eth".parse::<Input>().unwrap(),
            Input::Action(Action::SelectAsset(Side::To, Asset::Eth))
        );
        assert_eq!(
            "swap".parse::<Input>().unwrap(),
            Input::Action(Action::Swap)
        );
        assert_eq!("  ".parse::<Input>().unwrap(), Input::Show);
        assert_eq!("exit".parse::<Input>().unwrap(), Input::Quit);
    }

    #[test]
    fn test_parse_input_errors() {
        let err = "amount abc".parse::<Input>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid amount: abc");

        for value in ["NaN", "inf", "-infinity"] {
            let err = format!("target {value}").parse::<Input>().unwrap_err();
            assert_eq!(err.to_string(), format!("Invalid amount: {value}"));
        }

        let err = "from".parse::<Input>().unwrap_err();
        assert!(err.to_string().contains("Missing asset"));

        let err = "convert".parse::<Input>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown command: convert");
    }

    struct StaticProvider;

    #[async_trait]
    impl RateProvider for StaticProvider {
        async fn get_rate(&self, from: Asset, to: Asset) -> Result<f64, RateError> {
            if from == to {
                return Ok(1.0);
            }
            match Asset::quote_symbol(from, to)?.as_str() {
                "BTCUSDT" => Ok(65000.0),
                "ETHBTC" => Ok(20.0),
                _ => Ok(3000.0),
            }
        }
    }

    #[tokio::test]
    async fn test_script_runs_to_end_of_input() {
        let controller =
            ConversionController::new(Arc::new(StaticProvider), &ConversionDefaults::default());
        let script: &[u8] = b"amount 3\nbogus\nto eth\namount 5\n";

        let state = run(controller, script).await.unwrap();

        assert_eq!(state.from_asset, Asset::Btc);
        assert_eq!(state.to_asset, Asset::Eth);
        assert_eq!(state.course, Some(20.0));
        assert_eq!(state.to_value, Some(0.25));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_quit_stops_reading() {
        let controller =
            ConversionController::new(Arc::new(StaticProvider), &ConversionDefaults::default());
        let script: &[u8] = b"quit\nto eth\n";

        let state = run(controller, script).await.unwrap();

        assert_eq!(state.to_asset, Asset::Usdt);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_pair_changes_settle_on_final_pair() {
        let provider = DebouncedRateProvider::new(StaticProvider, Duration::from_millis(150));
        let controller =
            ConversionController::new(Arc::new(provider), &ConversionDefaults::default());
        let script: &[u8] = b"to eth\nto usdt\nfrom eth\nto btc\namount 2\n";

        let state = run(controller, script).await.unwrap();

        assert_eq!(state.from_asset, Asset::Eth);
        assert_eq!(state.to_asset, Asset::Btc);
        assert_eq!(state.course, Some(20.0));
        assert_eq!(state.to_value, Some(40.0));
        assert!(!state.loading);
        assert!(!state.error);
    }
}
