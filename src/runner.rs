//! Drives one search run against an HTTP form target and reports it.

use anyhow::{Context, Result};
use colored::*;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::candidates::{keyspace_size, load_wordlist, numeric_codes};
use crate::config::RunConfig;
use crate::probe::HttpFormProbe;
use crate::prober::{Prober, SearchResult};
use crate::stats::ProbeStats;

fn display_banner(config: &RunConfig) {
    println!("{}", "╔═══════════════════════════════════════════════════════════╗".cyan());
    println!("{}", "║   Form Code Search                                        ║".cyan());
    println!("{}", "║   Bounded concurrency, stops on first accepted code       ║".cyan());
    println!("{}", "╚═══════════════════════════════════════════════════════════╝".cyan());
    println!("{}", format!("[*] Target: {}", config.target.url).cyan());
}

/// Run the configured search to completion. Config and IO problems are the
/// only errors; a search that finds nothing returns `Exhausted`.
pub async fn execute(config: &RunConfig) -> Result<SearchResult<String, String>> {
    config.validate()?;
    display_banner(config);

    let probe = HttpFormProbe::new(config.target.clone())?;

    let (candidates, total): (Box<dyn Iterator<Item = String> + Send>, u64) = match &config.wordlist {
        Some(path) => {
            let words = load_wordlist(path)?;
            let total = words.len() as u64;
            println!("{}", format!("[*] Loaded {} candidates from {}", total, path.display()).cyan());
            (Box::new(words.into_iter()), total)
        }
        None => {
            let total = keyspace_size(config.digits);
            println!("{}", format!("[*] Searching {} {}-digit codes", total, config.digits).cyan());
            (Box::new(numeric_codes(config.digits)), total)
        }
    };

    let stats = Arc::new(ProbeStats::new(Some(total), config.progress_every));
    let prober = Prober::new(config.concurrency).with_stats(Arc::clone(&stats));

    println!(
        "{}",
        format!(
            "[*] Max concurrent probes: {} | timeout: {}s",
            prober.max_concurrency(),
            config.target.timeout_secs
        )
        .cyan()
    );
    println!();

    let result = prober.search(candidates, probe).await;

    stats.print_final().await;
    println!();

    match &result {
        SearchResult::Found { candidate, payload } => {
            println!("{}", format!("[+] Accepted code: {}", candidate).green().bold());
            println!("{}", "Response preview:".bold());
            println!("{}", payload.dimmed());
            if let Some(path) = &config.output {
                save_result(path, &config.target.url, candidate)?;
                println!("[+] Result saved to '{}'", path.display());
            }
        }
        SearchResult::Exhausted => {
            println!("{}", "[-] No candidate was accepted.".yellow());
            if stats.errors() > 0 {
                println!(
                    "{}",
                    format!(
                        "[!] {} probes ended without a verdict; the code may be among them.",
                        stats.errors()
                    )
                    .yellow()
                );
            }
        }
    }

    Ok(result)
}

/// Append `<timestamp> <url> <code>` to `path`.
pub fn save_result(path: &Path, url: &str, code: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Could not open result file '{}'", path.display()))?;
    writeln!(file, "{} {} {}", chrono::Local::now().to_rfc3339(), url, code)
        .with_context(|| format!("Error writing to result file '{}'", path.display()))?;
    Ok(())
}
