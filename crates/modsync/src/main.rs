use clap::Parser;

mod cli;
mod logging;
mod ui;

use cli::app::{App, Commands};
use cli::status::ExitStatus;
use cli::update::UpdateArg;

fn main() {
    let app = App::parse();
    logging::init(app.verbose);

    let status = match app.cmd {
        Commands::Completions(arg) => cli::setup::completions(arg).map(|()| ExitStatus::Success),
        Commands::Update(arg) => run_update(arg),
        Commands::UpdateHelpers(arg) => run_update(arg.into_update()),
    };

    let status = status.unwrap_or_else(|e| {
        tracing::error!("{e:#}");
        ExitStatus::Failed
    });
    std::process::exit(status.code());
}

fn run_update(arg: UpdateArg) -> anyhow::Result<ExitStatus> {
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(async move {
        let cancel = cli::shutdown_token();
        cli::update::update(arg, &cancel).await
    })
}
