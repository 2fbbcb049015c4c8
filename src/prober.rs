//! Bounded-concurrency first-match search.
//!
//! Candidates are handed to a [`Probe`] with at most `max_concurrency` probes
//! outstanding. The first success wins: it is written once into a shared slot,
//! the stop flag goes up, and the search returns without waiting for the rest.
//! Probes still in flight are detached and run to completion on their own;
//! whatever they report is discarded.

use futures::stream::{FuturesUnordered, StreamExt};
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::ProbeError;
use crate::probe::{Probe, ProbeOutcome};
use crate::stats::ProbeStats;

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult<C, P> {
    Found { candidate: C, payload: P },
    /// Every candidate was probed and none succeeded.
    Exhausted,
}

/// State shared by the coordinator and every probe task.
struct Shared<C, P> {
    stop: AtomicBool,
    winner: Mutex<Option<(C, P)>>,
}

/// What a probe task reports back to the coordinator.
enum Completion {
    /// This task filled the winner slot.
    Won,
    /// Failure, indeterminate, or a success that arrived after the slot was taken.
    Discarded,
    /// The stop flag was already up; the probe never ran.
    Skipped,
}

#[derive(Clone)]
pub struct Prober {
    max_concurrency: usize,
    stats: Option<Arc<ProbeStats>>,
}

impl Prober {
    pub fn new(max_concurrency: usize) -> Self {
        let max_concurrency = if max_concurrency == 0 {
            warn!("max_concurrency of 0 requested, using 1");
            1
        } else {
            max_concurrency
        };
        Self {
            max_concurrency,
            stats: None,
        }
    }

    /// Count every probe outcome into `stats`.
    pub fn with_stats(mut self, stats: Arc<ProbeStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Probe `candidates` until one succeeds or they run out.
    ///
    /// The iterator is consumed lazily and at most once; the stop flag is
    /// checked before each candidate is taken from it.
    pub async fn search<I, C, P, Pr>(&self, candidates: I, probe: Pr) -> SearchResult<C, P>
    where
        I: IntoIterator<Item = C>,
        C: Debug + Send + 'static,
        P: Send + 'static,
        Pr: Probe<C, P>,
    {
        let probe = Arc::new(probe);
        let shared = Arc::new(Shared {
            stop: AtomicBool::new(false),
            winner: Mutex::new(None),
        });
        let mut candidates = candidates.into_iter();
        let mut in_flight = FuturesUnordered::new();
        let mut dispatched: u64 = 0;

        info!(max_concurrency = self.max_concurrency, "search started");

        loop {
            while in_flight.len() < self.max_concurrency && !shared.stop.load(Ordering::Acquire) {
                let Some(candidate) = candidates.next() else {
                    break;
                };
                in_flight.push(tokio::spawn(run_probe(
                    candidate,
                    Arc::clone(&probe),
                    Arc::clone(&shared),
                    self.stats.clone(),
                )));
                dispatched += 1;
            }

            let Some(joined) = in_flight.next().await else {
                break;
            };

            match joined {
                Ok(Completion::Won) => {
                    if let Some((candidate, payload)) = shared.winner.lock().await.take() {
                        info!(
                            ?candidate,
                            dispatched,
                            abandoned = in_flight.len(),
                            "search resolved"
                        );
                        return SearchResult::Found { candidate, payload };
                    }
                }
                Ok(Completion::Discarded) | Ok(Completion::Skipped) => {}
                Err(e) => {
                    let cause = ProbeError::Panicked(e.to_string());
                    warn!(error = %cause, "probe task failed");
                    if let Some(stats) = &self.stats {
                        stats.record_error(&cause).await;
                    }
                }
            }
        }

        info!(dispatched, "search exhausted");
        SearchResult::Exhausted
    }
}

async fn run_probe<C, P, Pr>(
    candidate: C,
    probe: Arc<Pr>,
    shared: Arc<Shared<C, P>>,
    stats: Option<Arc<ProbeStats>>,
) -> Completion
where
    C: Debug + Send + 'static,
    P: Send + 'static,
    Pr: Probe<C, P>,
{
    if shared.stop.load(Ordering::Acquire) {
        return Completion::Skipped;
    }

    match probe.probe(candidate).await {
        ProbeOutcome::Success { candidate, payload } => {
            let mut slot = shared.winner.lock().await;
            if slot.is_none() {
                *slot = Some((candidate, payload));
                shared.stop.store(true, Ordering::Release);
                if let Some(stats) = &stats {
                    stats.record_success();
                }
                Completion::Won
            } else {
                debug!(?candidate, "late success discarded");
                if let Some(stats) = &stats {
                    stats.record_late_success();
                }
                Completion::Discarded
            }
        }
        ProbeOutcome::Failure { .. } => {
            if let Some(stats) = &stats {
                stats.record_failure();
            }
            Completion::Discarded
        }
        ProbeOutcome::Indeterminate { candidate, cause } => {
            debug!(?candidate, error = %cause, "probe indeterminate");
            if let Some(stats) = &stats {
                stats.record_error(&cause).await;
            }
            Completion::Discarded
        }
    }
}

/// Search `candidates` with at most `max_concurrency` probes outstanding.
pub async fn search<I, C, P, Pr>(candidates: I, probe: Pr, max_concurrency: usize) -> SearchResult<C, P>
where
    I: IntoIterator<Item = C>,
    C: Debug + Send + 'static,
    P: Send + 'static,
    Pr: Probe<C, P>,
{
    Prober::new(max_concurrency).search(candidates, probe).await
}
