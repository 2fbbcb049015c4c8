use anyhow::{bail, Result};
use colored::*;
use std::path::Path;

use codeprobe::config::{HttpFormConfig, RunConfig};

/// Write a starter config with every field present and a placeholder target.
/// Never overwrites an existing file.
pub fn write_template(output: &Path) -> Result<()> {
    if output.exists() {
        bail!("Refusing to overwrite existing file '{}'", output.display());
    }
    let template = RunConfig {
        target: HttpFormConfig {
            url: "http://127.0.0.1:1337/reset_password.php".to_string(),
            ..HttpFormConfig::default()
        },
        ..RunConfig::default()
    };
    template.save(output)?;
    println!("{}", format!("[+] Template written to '{}'", output.display()).green());
    println!("{}", "    Edit the target section, then: codeprobe run --config <file>".dimmed());
    Ok(())
}
