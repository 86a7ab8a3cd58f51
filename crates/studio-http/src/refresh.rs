//! Single-flight coordination of token refreshes.
//!
//! At most one refresh call is outstanding per client. Callers that hit a
//! `401` while a refresh is running are queued and released together with
//! that refresh's outcome.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;
use tracing::{debug, trace};

use studio_core::AccessToken;

/// Why a refresh wave failed. Shared by every caller in the wave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RefreshFailure {
    pub reason: String,
}

impl RefreshFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Outcome of asking the coordinator for a usable token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Renewal {
    /// A refresh ran (here or in the wave this caller joined) and produced this token.
    Refreshed(AccessToken),
    /// A wave settled after the caller's request was sent; reload the store instead.
    Settled,
}

type Waiter = oneshot::Sender<Result<AccessToken, RefreshFailure>>;

#[derive(Default)]
struct RefreshState {
    in_progress: bool,
    waiters: Vec<Waiter>,
    /// Number of waves that have settled, successfully or not.
    epoch: u64,
}

/// Serializes refresh calls and queues callers behind the one in flight.
#[derive(Default)]
pub(crate) struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        // The state is consistent after every critical section.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of settled waves. Read before sending a request and pass it
    /// back to [`renew`](Self::renew) when that request is rejected.
    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    /// Whether a refresh is currently outstanding.
    pub fn in_progress(&self) -> bool {
        self.lock().in_progress
    }

    /// Obtain a token after a rejected request sent during `seen_epoch`.
    ///
    /// - a refresh is in flight: wait for its outcome;
    /// - a wave settled since `seen_epoch`: return [`Renewal::Settled`];
    /// - otherwise run `refresh` as the leader of a new wave.
    ///
    /// `refresh` is responsible for persisting the new pair on success and
    /// tearing the session down on failure; the coordinator only hands its
    /// outcome to every waiter.
    pub async fn renew<F, Fut>(
        &self,
        seen_epoch: u64,
        refresh: F,
    ) -> Result<Renewal, RefreshFailure>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AccessToken, RefreshFailure>>,
    {
        let queued = {
            let mut state = self.lock();
            if state.in_progress {
                let (tx, rx) = oneshot::channel();
                state.waiters.push(tx);
                trace!(queued = state.waiters.len(), "Refresh in flight, waiting");
                Some(rx)
            } else if state.epoch != seen_epoch {
                return Ok(Renewal::Settled);
            } else {
                state.in_progress = true;
                None
            }
        };

        if let Some(rx) = queued {
            return match rx.await {
                Ok(outcome) => outcome.map(Renewal::Refreshed),
                Err(_) => Err(RefreshFailure::new("refresh was abandoned")),
            };
        }

        debug!("Starting refresh wave");
        let wave = Wave {
            coordinator: self,
            settled: false,
        };
        let outcome = refresh().await;
        wave.settle(outcome.clone());
        outcome.map(Renewal::Refreshed)
    }

    /// Clear the flag, bump the epoch and release every waiter with `outcome`.
    fn settle(&self, outcome: Result<AccessToken, RefreshFailure>) {
        let waiters = {
            let mut state = self.lock();
            state.in_progress = false;
            state.epoch += 1;
            std::mem::take(&mut state.waiters)
        };

        debug!(
            waiters = waiters.len(),
            success = outcome.is_ok(),
            "Refresh wave settled"
        );
        for waiter in waiters {
            // A waiter whose caller went away is simply skipped.
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// The leader's hold on a wave. Settles with a failure if the leader is
/// dropped before its refresh completes.
struct Wave<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl Wave<'_> {
    fn settle(mut self, outcome: Result<AccessToken, RefreshFailure>) {
        self.settled = true;
        self.coordinator.settle(outcome);
    }
}

impl Drop for Wave<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator
                .settle(Err(RefreshFailure::new("refresh was cancelled")));
        }
    }
}
