use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as _;
use tracing::debug;

use fs_sim_kit::{Shell, SimFS};

use crate::cli::Cli;

mod cli;

fn main() -> anyhow::Result<ExitCode> {
    let cli_args = Cli::parse();
    setup_tracing(&cli_args);
    debug!("Parsed CLI arguments: {cli_args:?}");

    let mut shell = Shell::new(SimFS::new(), io::stdout(), io::stderr())
        .context("failed to create the filesystem")?
        .with_echo(cli_args.echo);

    let failures = match &cli_args.script {
        Some(script) => shell.run_script(script)?,
        None => shell.run(io::stdin().lock()).context("failed to read commands")?,
    };
    debug!("Session finished, {failures} command(s) failed");

    Ok(ExitCode::from(exit_status(failures)))
}

/// 1 if any command of the session failed, 0 otherwise.
fn exit_status(failures: usize) -> u8 {
    if failures > 0 { 1 } else { 0 }
}

fn setup_tracing(cli_args: &Cli) {
    if let Some(level) = cli_args.log_level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .without_time()
            .compact()
            .init();
    }
}
