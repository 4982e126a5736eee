use super::ui;
use crate::core::conversion;
use crate::core::{Asset, RateError, RateProvider};
use anyhow::Result;
use comfy_table::{Cell, Table};
use futures::future::join_all;

pub struct PairRate {
    pub from: Asset,
    pub to: Asset,
    pub rate: Result<f64, RateError>,
}

/// Every ordered pair of distinct assets.
pub fn all_pairs() -> Vec<(Asset, Asset)> {
    Asset::ALL
        .iter()
        .flat_map(|from| {
            Asset::ALL
                .iter()
                .filter(move |to| *to != from)
                .map(move |to| (*from, *to))
        })
        .collect()
}

/// Fetches all pairs concurrently. Expects an undebounced provider, since a
/// debounced one would collapse the whole batch into one request.
pub async fn fetch_rates(provider: &(dyn RateProvider + Send + Sync)) -> Vec<PairRate> {
    let pairs = all_pairs();
    let pb = ui::new_progress_bar(pairs.len() as u64);

    let futures = pairs.into_iter().map(|(from, to)| {
        let pb = pb.clone();
        async move {
            let rate = provider.get_rate(from, to).await;
            pb.inc(1);
            PairRate { from, to, rate }
        }
    });
    let results = join_all(futures).await;
    pb.finish_and_clear();
    results
}

pub fn rates_table(rates: &[PairRate]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Symbol"),
        ui::header_cell("Rate"),
    ]);

    for pair in rates {
        let symbol = Asset::quote_symbol(pair.from, pair.to).unwrap_or_default();
        let rate_cell = match &pair.rate {
            Ok(rate) => Cell::new(
                conversion::rate_text(pair.from, pair.to, Some(*rate)).unwrap_or_default(),
            ),
            Err(e) => ui::error_cell(&e.to_string()),
        };
        table.add_row(vec![
            Cell::new(pair.from.code()),
            Cell::new(pair.to.code()),
            Cell::new(symbol),
            rate_cell,
        ]);
    }
    table
}

pub async fn run(provider: &(dyn RateProvider + Send + Sync)) -> Result<()> {
    let rates = fetch_rates(provider).await;

    println!("{}", ui::style_text("Exchange rates", ui::StyleType::Title));
    println!("{}", rates_table(&rates));

    let failed = rates.iter().filter(|r| r.rate.is_err()).count();
    if failed == rates.len() {
        anyhow::bail!("Failed to fetch any exchange rate");
    }
    Ok(())
}
