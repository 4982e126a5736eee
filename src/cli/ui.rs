use chrono::{DateTime, Local};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::controller::ConversionState;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Value,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Value => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right aligned amount cell. `None` is displayed as "N/A".
pub fn amount_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) => Cell::new(format_amount(Some(v))).set_alignment(CellAlignment::Right),
        None => Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
    }
}

pub fn error_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::Red)
}

pub fn format_amount(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

/// Formats the fetch timestamp as `dd.mm.yyyy HH:MM`.
pub fn format_request_date(date: &DateTime<Local>) -> String {
    date.format("%d.%m.%Y %H:%M").to_string()
}

/// Spinner shown while a rate request is in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Renders the converter: both amounts with their assets, the rate line and
/// the request timestamp.
pub fn render_conversion(state: &ConversionState, rate_text: Option<&str>) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("From"),
        header_cell(""),
        header_cell("To"),
        header_cell(""),
    ]);
    table.add_row(vec![
        amount_cell(state.from_value),
        Cell::new(state.from_asset.code()),
        amount_cell(state.to_value),
        Cell::new(state.to_asset.code()),
    ]);

    let mut lines = vec![table.to_string()];
    if let Some(text) = rate_text {
        lines.push(style_text(text, StyleType::Value));
    }
    if state.error {
        lines.push(style_text("Failed to fetch exchange rate", StyleType::Error));
    } else if state.loading {
        lines.push(style_text("Loading rate...", StyleType::Subtle));
    }
    if let Some(date) = &state.request_date {
        lines.push(style_text(
            &format!("Rates are for reference only - {}", format_request_date(date)),
            StyleType::Subtle,
        ));
    }
    lines.join("\n")
}
