//! The probe seam: one check of one candidate against an external target.

pub mod http_form;

use std::future::Future;

use crate::error::ProbeError;

pub use http_form::HttpFormProbe;

/// Verdict of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome<C, P> {
    /// The target accepted the candidate. `payload` carries whatever evidence
    /// the probe chose to keep.
    Success { candidate: C, payload: P },
    /// The target rejected the candidate.
    Failure { candidate: C },
    /// No verdict could be reached; treated as a non-fatal failure.
    Indeterminate { candidate: C, cause: ProbeError },
}

impl<C, P> ProbeOutcome<C, P> {
    pub fn candidate(&self) -> &C {
        match self {
            ProbeOutcome::Success { candidate, .. }
            | ProbeOutcome::Failure { candidate }
            | ProbeOutcome::Indeterminate { candidate, .. } => candidate,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }
}

/// Something the prober can call concurrently, once per candidate.
///
/// Implementations must not share mutable state between invocations; the
/// prober owns all coordination.
pub trait Probe<C, P>: Send + Sync + 'static {
    fn probe(&self, candidate: C) -> impl Future<Output = ProbeOutcome<C, P>> + Send;
}

/// Adapter turning an async closure into a [`Probe`].
#[derive(Debug, Clone)]
pub struct FnProbe<F>(F);

/// Wrap `f` so it can be handed to the prober.
pub fn probe_fn<F>(f: F) -> FnProbe<F> {
    FnProbe(f)
}

impl<C, P, F, Fut> Probe<C, P> for FnProbe<F>
where
    F: Fn(C) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ProbeOutcome<C, P>> + Send,
{
    fn probe(&self, candidate: C) -> impl Future<Output = ProbeOutcome<C, P>> + Send {
        (self.0)(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closure_probe_reports_outcomes() {
        let probe = probe_fn(|code: String| async move {
            if code == "0007" {
                ProbeOutcome::Success { candidate: code, payload: "welcome" }
            } else {
                ProbeOutcome::Failure { candidate: code }
            }
        });

        let hit = probe.probe("0007".to_string()).await;
        assert!(hit.is_success());
        assert_eq!(hit.candidate(), "0007");

        let miss = probe.probe("0001".to_string()).await;
        assert_eq!(miss, ProbeOutcome::Failure { candidate: "0001".to_string() });
    }
}
