// actions-toolkit: issue workflow commands from shell steps.
//
// Usage:
//   actions-toolkit set-output NAME VALUE [--json]
//   actions-toolkit group NAME -- CMD [ARGS...]
//
// Protocol output goes to stdout; diagnostics go to stderr and are filtered
// with RUST_LOG (default `warn`).

use anyhow::Context;
use clap::Parser;
use toolkit_cli::{execute, Cli};
use toolkit_core::{CommandChannel, ExitStatus};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e:#}");
            ExitStatus::Failure.code()
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let channel = CommandChannel::from_process();
    runtime.block_on(execute(cli.command, &channel))
}
