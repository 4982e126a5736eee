//! State and actions behind the converter view.
//!
//! The controller owns a single [`ConversionState`] and mutates it only
//! through [`Action`]s. Actions that change the pair or the source amount
//! issue a [`RefreshTicket`]; fetched rates are applied with
//! [`ConversionController::complete_refresh`], which drops any outcome that
//! belongs to a superseded ticket.

use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::config::ConversionDefaults;
use crate::core::conversion;
use crate::core::{Asset, RateError, RateProvider, Side};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionState {
    pub from_asset: Asset,
    pub to_asset: Asset,
    pub from_value: Option<f64>,
    pub to_value: Option<f64>,
    pub course: Option<f64>,
    pub request_date: Option<DateTime<Local>>,
    pub loading: bool,
    pub error: bool,
}

impl ConversionState {
    pub fn new(defaults: &ConversionDefaults) -> Self {
        ConversionState {
            from_asset: defaults.from,
            to_asset: defaults.to,
            from_value: defaults.amount,
            to_value: None,
            course: None,
            request_date: None,
            loading: false,
            error: false,
        }
    }
}

impl Default for ConversionState {
    fn default() -> Self {
        Self::new(&ConversionDefaults::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    SetFromValue(Option<f64>),
    /// Raw setter for the derived amount; overwritten by the next recompute.
    SetToValue(Option<f64>),
    SelectAsset(Side, Asset),
    Swap,
    RefreshRate,
}

/// A rate request issued by the controller. Only the most recently issued
/// ticket is applied on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
    pub from: Asset,
    pub to: Asset,
}

pub struct ConversionController {
    state: ConversionState,
    provider: Arc<dyn RateProvider>,
    generation: u64,
}

impl ConversionController {
    pub fn new(provider: Arc<dyn RateProvider>, defaults: &ConversionDefaults) -> Self {
        Self {
            state: ConversionState::new(defaults),
            provider,
            generation: 0,
        }
    }

    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    pub fn provider(&self) -> Arc<dyn RateProvider> {
        Arc::clone(&self.provider)
    }

    /// Initial rate load.
    pub async fn mount(&mut self) {
        self.dispatch(Action::RefreshRate).await;
    }

    /// Applies an action and, when it calls for one, fetches the rate inline.
    pub async fn dispatch(&mut self, action: Action) {
        if let Some(ticket) = self.apply(action) {
            let result = self.provider.get_rate(ticket.from, ticket.to).await;
            self.complete_refresh(ticket, result);
        }
    }

    /// Reduces `action` into the state. Returns a ticket when a rate fetch
    /// must follow.
    pub fn apply(&mut self, action: Action) -> Option<RefreshTicket> {
        debug!(?action, "Applying action");
        match action {
            Action::SetFromValue(value) => {
                if self.state.from_value == value {
                    return None;
                }
                self.state.from_value = value;
                self.recompute();
            }
            Action::SetToValue(value) => {
                self.state.to_value = value;
                return None;
            }
            Action::SelectAsset(side, asset) => {
                let slot = match side {
                    Side::From => &mut self.state.from_asset,
                    Side::To => &mut self.state.to_asset,
                };
                if *slot == asset {
                    return None;
                }
                *slot = asset;
            }
            Action::Swap => {
                let state = &mut self.state;
                std::mem::swap(&mut state.from_asset, &mut state.to_asset);
                std::mem::swap(&mut state.from_value, &mut state.to_value);
            }
            Action::RefreshRate => {}
        }
        Some(self.issue_ticket())
    }

    /// Applies a fetch outcome. Returns `false` if the ticket was superseded
    /// and the outcome discarded.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<f64, RateError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "Discarding stale rate response"
            );
            return false;
        }

        self.state.loading = false;
        match result {
            Ok(course) => {
                debug!(course, from = %ticket.from, to = %ticket.to, "Rate updated");
                self.state.course = Some(course);
                self.state.error = false;
                self.recompute();
                self.state.request_date = Some(Local::now());
            }
            Err(e) => {
                warn!(error = %e, from = %ticket.from, to = %ticket.to, "Rate fetch failed");
                self.state.error = true;
            }
        }
        true
    }

    /// The "1 X = Y Z" line, once a course is known.
    pub fn rate_text(&self) -> Option<String> {
        conversion::rate_text(self.state.from_asset, self.state.to_asset, self.state.course)
    }

    fn issue_ticket(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.state.loading = true;
        RefreshTicket {
            generation: self.generation,
            from: self.state.from_asset,
            to: self.state.to_asset,
        }
    }

    fn recompute(&mut self) {
        let state = &mut self.state;
        state.to_value = conversion::convert(
            state.from_asset,
            state.to_asset,
            state.from_value,
            state.course,
        );
    }
}
