use colored::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::Mutex;

use crate::error::ProbeError;

/// Attempt counters shared between the prober and its reporter.
pub struct ProbeStats {
    total_attempts: AtomicU64,
    successful_attempts: AtomicU64,
    late_attempts: AtomicU64,
    failed_attempts: AtomicU64,
    error_attempts: AtomicU64,
    start_time: Instant,
    unique_errors: Mutex<HashMap<String, usize>>,
    domain_size: Option<u64>,
    progress_every: u64,
}

impl ProbeStats {
    /// `domain_size` is shown in progress lines when known. A `progress_every`
    /// of 0 disables them.
    pub fn new(domain_size: Option<u64>, progress_every: u64) -> Self {
        Self {
            total_attempts: AtomicU64::new(0),
            successful_attempts: AtomicU64::new(0),
            late_attempts: AtomicU64::new(0),
            failed_attempts: AtomicU64::new(0),
            error_attempts: AtomicU64::new(0),
            start_time: Instant::now(),
            unique_errors: Mutex::new(HashMap::new()),
            domain_size,
            progress_every,
        }
    }

    /// Counters only, no progress lines.
    pub fn silent() -> Self {
        Self::new(None, 0)
    }

    fn record_attempt(&self, counter: &AtomicU64) {
        let total = self.total_attempts.fetch_add(1, Ordering::Relaxed) + 1;
        counter.fetch_add(1, Ordering::Relaxed);
        if let Some(line) = self.progress_line(total) {
            println!("{}", line);
        }
    }

    /// The winning attempt.
    pub fn record_success(&self) {
        self.record_attempt(&self.successful_attempts);
    }

    /// An accepted candidate that arrived after the winner was already chosen.
    pub fn record_late_success(&self) {
        self.record_attempt(&self.late_attempts);
    }

    pub fn record_failure(&self) {
        self.record_attempt(&self.failed_attempts);
    }

    pub async fn record_error(&self, cause: &ProbeError) {
        self.record_attempt(&self.error_attempts);
        let mut guard = self.unique_errors.lock().await;
        *guard.entry(cause.to_string()).or_insert(0) += 1;
    }

    pub fn total(&self) -> u64 {
        self.total_attempts.load(Ordering::Relaxed)
    }

    pub fn successes(&self) -> u64 {
        self.successful_attempts.load(Ordering::Relaxed)
    }

    pub fn late_successes(&self) -> u64 {
        self.late_attempts.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failed_attempts.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.error_attempts.load(Ordering::Relaxed)
    }

    /// Most frequent error messages, highest count first.
    pub async fn top_errors(&self, limit: usize) -> Vec<(String, usize)> {
        let guard = self.unique_errors.lock().await;
        let mut sorted: Vec<(String, usize)> =
            guard.iter().map(|(msg, count)| (msg.clone(), *count)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sorted.truncate(limit);
        sorted
    }

    /// Progress line due after `total` attempts, if any. Every
    /// `progress_every`-th attempt gets one; 0 turns them off.
    pub fn progress_line(&self, total: u64) -> Option<String> {
        if self.progress_every == 0 || total == 0 || total % self.progress_every != 0 {
            return None;
        }
        let tried = match self.domain_size {
            Some(size) => format!("{}/{}", total.to_string().bold(), size),
            None => total.to_string().bold().to_string(),
        };
        Some(format!(
            "{} Tried {} codes... ({} err)",
            "[*]".cyan(),
            tried,
            self.errors().to_string().red()
        ))
    }

    pub async fn print_final(&self) {
        let total = self.total();
        let elapsed = self.start_time.elapsed().as_secs_f64();

        println!();
        println!("{}", "=== Statistics ===".bold());
        println!("  Total attempts:    {}", total);
        println!("  Successful:        {}", self.successes().to_string().green().bold());
        if self.late_successes() > 0 {
            println!("  Late (discarded):  {}", self.late_successes());
        }
        println!("  Failed:            {}", self.failures());
        println!("  Errors:            {}", self.errors().to_string().red());
        println!("  Elapsed time:      {:.2}s", elapsed);
        if elapsed > 0.0 {
            println!("  Average rate:      {:.1} attempts/s", total as f64 / elapsed);
        }

        let top = self.top_errors(5).await;
        if !top.is_empty() {
            println!("\n{}", "Top Errors:".bold());
            for (msg, count) in top {
                println!("  - {}: {}", msg.yellow(), count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn counters_split_by_outcome() {
        let stats = ProbeStats::silent();
        stats.record_failure();
        stats.record_failure();
        stats.record_success();
        stats.record_late_success();
        stats.record_error(&ProbeError::Timeout(Duration::from_secs(3))).await;

        assert_eq!(stats.total(), 5);
        assert_eq!(stats.late_successes(), 1);
        assert_eq!(stats.failures(), 2);
        assert_eq!(stats.successes(), 1);
        assert_eq!(stats.errors(), 1);
    }

    #[test]
    fn progress_every_nth_attempt_with_total() {
        colored::control::set_override(false);
        let stats = ProbeStats::new(Some(10_000), 500);
        assert_eq!(stats.progress_line(499), None);
        assert_eq!(
            stats.progress_line(500).as_deref(),
            Some("[*] Tried 500/10000 codes... (0 err)")
        );
        assert_eq!(
            stats.progress_line(1000).as_deref(),
            Some("[*] Tried 1000/10000 codes... (0 err)")
        );
        assert_eq!(stats.progress_line(1001), None);
    }

    #[test]
    fn progress_without_known_total() {
        colored::control::set_override(false);
        let stats = ProbeStats::new(None, 500);
        assert_eq!(stats.progress_line(499), None);
        assert_eq!(
            stats.progress_line(500).as_deref(),
            Some("[*] Tried 500 codes... (0 err)")
        );
    }

    #[test]
    fn progress_disabled_at_zero() {
        let stats = ProbeStats::new(Some(10_000), 0);
        assert_eq!(stats.progress_line(500), None);
        assert_eq!(stats.progress_line(1000), None);
        assert_eq!(ProbeStats::silent().progress_line(500), None);
    }

    #[tokio::test]
    async fn top_errors_orders_by_count() {
        let stats = ProbeStats::silent();
        let refused = ProbeError::Transport("connection refused".into());
        let timeout = ProbeError::Timeout(Duration::from_secs(3));
        stats.record_error(&timeout).await;
        stats.record_error(&refused).await;
        stats.record_error(&refused).await;

        let top = stats.top_errors(5).await;
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], ("transport error: connection refused".to_string(), 2));
        assert_eq!(top[1].1, 1);
    }
}
