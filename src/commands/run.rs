use anyhow::{anyhow, Result};
use codeprobe::config::RunConfig;
use codeprobe::runner;

use crate::cli::RunArgs;

pub async fn run(args: &RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    apply_overrides(&mut config, args)?;

    runner::execute(&config).await?;
    Ok(())
}

/// Command-line flags win over the config file.
fn apply_overrides(config: &mut RunConfig, args: &RunArgs) -> Result<()> {
    if let Some(url) = &args.url {
        config.target.url = url.clone();
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(digits) = args.digits {
        config.digits = digits;
    }
    if let Some(wordlist) = &args.wordlist {
        config.wordlist = Some(wordlist.clone());
    }
    if let Some(cookie) = &args.cookie {
        config.target.cookie = Some(cookie.clone());
    }
    if let Some(timeout) = args.timeout {
        config.target.timeout_secs = timeout;
    }
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }
    for field in &args.fields {
        let (name, value) = field
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid field '{}', expected NAME=VALUE", field))?;
        config
            .target
            .extra_fields
            .retain(|(existing, _)| existing != name);
        config
            .target
            .extra_fields
            .push((name.to_string(), value.to_string()));
    }
    Ok(())
}
