use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::sync::{Mutex, oneshot};
use tracing::debug;

use crate::core::{Asset, RateError, RateProvider};

/// Coalesces bursts of calls into a single trailing call.
///
/// Every call waits for `window`. If another call arrives meanwhile, the
/// earlier one stands down and waits for the outcome of the later one. Only
/// the last call of a burst runs its operation; its outcome is handed to all
/// callers of that burst.
pub struct Debouncer<T> {
    window: Duration,
    pending: Mutex<Pending<T>>,
}

struct Pending<T> {
    latest: u64,
    waiters: Vec<oneshot::Sender<T>>,
}

impl<T: Clone + Send> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(Pending {
                latest: 0,
                waiters: Vec::new(),
            }),
        }
    }

    /// Returns `None` when the trailing call of this burst was dropped before
    /// it could deliver an outcome.
    pub async fn call<F, Fut>(&self, op: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let (tx, rx) = oneshot::channel();
        let ticket = {
            let mut pending = self.pending.lock().await;
            pending.latest += 1;
            pending.waiters.push(tx);
            pending.latest
        };

        tokio::time::sleep(self.window).await;

        let waiters = {
            let mut pending = self.pending.lock().await;
            (pending.latest == ticket).then(|| std::mem::take(&mut pending.waiters))
        };

        if let Some(waiters) = waiters {
            debug!(callers = waiters.len(), "Debounce window elapsed");
            let outcome = op().await;
            for waiter in waiters {
                let _ = waiter.send(outcome.clone());
            }
        }

        rx.await.ok()
    }
}

/// Outcome of one trailing lookup, tagged with the pair it was fetched for.
type PairOutcome = ((Asset, Asset), Result<f64, RateError>);

/// Wraps a [`RateProvider`] so that rapid lookups share one upstream request.
///
/// A burst may mix pairs. Callers whose pair was not the one fetched go
/// through the debouncer again for their own pair, so every caller receives
/// a rate for the pair it asked for.
pub struct DebouncedRateProvider<P: RateProvider> {
    inner: P,
    debouncer: Debouncer<PairOutcome>,
}

impl<P: RateProvider> DebouncedRateProvider<P> {
    pub fn new(inner: P, window: Duration) -> Self {
        Self {
            inner,
            debouncer: Debouncer::new(window),
        }
    }
}

// Reversed pairs map to the same upstream symbol and raw quote.
fn same_quote(fetched: (Asset, Asset), wanted: (Asset, Asset)) -> bool {
    fetched == wanted || fetched == (wanted.1, wanted.0)
}

#[async_trait]
impl<P: RateProvider> RateProvider for DebouncedRateProvider<P> {
    async fn get_rate(&self, from: Asset, to: Asset) -> Result<f64, RateError> {
        loop {
            let outcome = self
                .debouncer
                .call(|| async { ((from, to), self.inner.get_rate(from, to).await) })
                .await;

            match outcome {
                Some((fetched, result)) if same_quote(fetched, (from, to)) => return result,
                Some((fetched, _)) => {
                    debug!(
                        fetched = ?fetched,
                        from = %from,
                        to = %to,
                        "Burst resolved for another pair, requesting again"
                    );
                }
                None => {
                    return Err(RateError::Network(
                        "Rate request dropped before completion".to_string(),
                    ));
                }
            }
        }
    }
}
