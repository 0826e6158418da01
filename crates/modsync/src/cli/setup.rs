use anyhow::{Context, Result};
use clap::{Args, CommandFactory};
use clap_complete::{Shell, generate};

use crate::cli::app::App;

#[derive(Args, Clone, Debug)]
pub struct CompletionsArg {
    /// Shell to generate for; detected from $SHELL when omitted.
    #[arg(long, value_enum)]
    shell: Option<Shell>,
}

pub fn completions(arg: CompletionsArg) -> Result<()> {
    let shell = match arg.shell {
        Some(shell) => shell,
        None => Shell::from_env().context("failed to detect the current shell, pass --shell")?,
    };

    let mut cmd = App::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
