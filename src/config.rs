use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::candidates::MAX_DIGITS;

pub const DEFAULT_USER_AGENT: &str = "codeprobe/0.3";
pub const DEFAULT_FAILURE_MARKER: &str = "Invalid or expired recovery code!";

/// Everything the HTTP form probe needs to know about its target.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HttpFormConfig {
    /// Full URL of the form endpoint, e.g. "http://10.10.1.5:1337/reset_password.php"
    pub url: String,
    /// Form field that carries the candidate.
    pub code_field: String,
    /// Fixed fields sent with every submission (hidden inputs and the like).
    pub extra_fields: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// Raw Cookie header value, e.g. "PHPSESSID=abc123"
    pub cookie: Option<String>,
    /// Response text that marks a rejected code. Anything else counts as a hit.
    pub failure_marker: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Bytes of the winning response body kept for the report.
    pub preview_len: usize,
}

impl Default for HttpFormConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            code_field: "recovery_code".to_string(),
            extra_fields: Vec::new(),
            headers: Vec::new(),
            cookie: None,
            failure_marker: DEFAULT_FAILURE_MARKER.to_string(),
            timeout_secs: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            preview_len: 200,
        }
    }
}

impl HttpFormConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.url.trim();
        if url.is_empty() {
            bail!("Target URL cannot be empty");
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("Target URL must start with http:// or https:// (got '{}')", url);
        }
        if self.code_field.trim().is_empty() {
            bail!("Code field name cannot be empty");
        }
        if self.failure_marker.is_empty() {
            bail!("Failure marker cannot be empty");
        }
        if self.timeout_secs == 0 {
            bail!("Probe timeout must be at least one second");
        }
        Ok(())
    }
}

/// A complete search run: the target plus how to walk the code space.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    pub target: HttpFormConfig,
    pub concurrency: usize,
    pub digits: u32,
    /// Replaces the numeric code space when set.
    pub wordlist: Option<PathBuf>,
    pub progress_every: u64,
    pub output: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target: HttpFormConfig::default(),
            concurrency: 100,
            digits: 4,
            wordlist: None,
            progress_every: 500,
            output: None,
        }
    }
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: RunConfig =
            serde_json::from_str(&content).context("Invalid config format")?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config file '{}'", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.target.validate()?;
        if self.concurrency == 0 {
            bail!("Concurrency must be at least 1");
        }
        if self.wordlist.is_none() && !(1..=MAX_DIGITS).contains(&self.digits) {
            return Err(anyhow!(
                "Digits must be between 1 and {} (got {})",
                MAX_DIGITS,
                self.digits
            ));
        }
        Ok(())
    }
}
