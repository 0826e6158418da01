use clap::{ArgAction, Parser, Subcommand};

use crate::cli::setup::CompletionsArg;
use crate::cli::update::{HelpersArg, UpdateArg};

#[derive(Clone, Debug, Parser)]
#[command(name = "modsync", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Download and update every mod of the given categories into a directory.
    #[command(alias = "u", name = "update")]
    Update(UpdateArg),

    /// Same as `update -c 5081 4632 575` (helpers, other/misc, tools).
    #[command(alias = "uh", name = "update-helpers")]
    UpdateHelpers(HelpersArg),

    /// Print a shell completion script to stdout.
    #[command(name = "completions")]
    Completions(CompletionsArg),
}
