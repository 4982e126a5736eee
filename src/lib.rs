pub mod cli;
pub mod controller;
pub mod core;
pub mod providers;

use crate::core::Asset;
use crate::core::config::{AppConfig, ConversionDefaults};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Values left out fall back to the configured defaults.
    Convert {
        amount: Option<f64>,
        from: Option<Asset>,
        to: Option<Asset>,
        swap: bool,
    },
    Rates,
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("coinconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let binance = providers::BinanceProvider::new(&config.provider.base_url)?;

    match command {
        AppCommand::Convert {
            amount,
            from,
            to,
            swap,
        } => {
            let initial = ConversionDefaults {
                from: from.unwrap_or(config.defaults.from),
                to: to.unwrap_or(config.defaults.to),
                amount: amount.or(config.defaults.amount),
            };
            let provider = Arc::new(providers::DebouncedRateProvider::new(
                binance,
                config.debounce_window(),
            ));
            cli::convert::run(provider, &initial, swap).await?;
            Ok(())
        }
        AppCommand::Rates => cli::rates::run(&binance).await,
        AppCommand::Interactive => {
            let provider = Arc::new(providers::DebouncedRateProvider::new(
                binance,
                config.debounce_window(),
            ));
            let controller = controller::ConversionController::new(provider, &config.defaults);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cli::interactive::run(controller, stdin).await?;
            Ok(())
        }
    }
}
