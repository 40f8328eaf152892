//! Mailera - email triage onboarding and dashboard shell.
//!
//! Walks a user through persona selection, priority-rule tuning and mailbox
//! authorization, persisting progress between invocations.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod loopback;
mod render;
mod settings;
mod shell;
mod tuning;

use std::process::ExitCode;

use clap::Parser;
use mailera_core::StateStore;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use settings::Settings;
use shell::Shell;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailera=info,mailera_core=info,mailera_oauth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings_path = cli.config.unwrap_or_else(Settings::default_path);
    let settings = Settings::load(&settings_path).await?;
    debug!(path = %settings_path.display(), provider = %settings.provider, "Settings loaded");

    let store = match cli.state_file {
        Some(path) => StateStore::new(path),
        None => StateStore::in_data_dir()?,
    };

    let mut shell = Shell::open(store, settings).await?;
    shell.run(cli.command.unwrap_or(Command::Status)).await
}
