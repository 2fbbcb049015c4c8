//! Bounded-concurrency first-match search over a finite candidate space,
//! with an HTTP form probe for checking short numeric codes.

pub mod candidates;
pub mod config;
pub mod error;
pub mod probe;
pub mod prober;
pub mod runner;
pub mod stats;

pub use config::{HttpFormConfig, RunConfig};
pub use error::ProbeError;
pub use probe::{probe_fn, HttpFormProbe, Probe, ProbeOutcome};
pub use prober::{search, Prober, SearchResult};
pub use stats::ProbeStats;
