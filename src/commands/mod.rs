pub mod run;
pub mod template;

use anyhow::Result;
use crate::cli::{Cli, Command};

pub async fn handle_command(cli_args: &Cli) -> Result<()> {
    match &cli_args.command {
        Command::Run(args) => run::run(args).await?,
        Command::Template { output } => template::write_template(output)?,
    }
    Ok(())
}
