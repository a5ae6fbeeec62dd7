mod cache;
mod cli;
mod config;
mod publisher;
mod service;
mod state;
mod storage;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    cli::{execute, exit_status, Cli},
    config::Config,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "subtrack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(timeout_ms) = cli.timeout_ms.filter(|ms| *ms > 0) {
        config.operation_timeout_ms = timeout_ms;
    }
    tracing::debug!(?config, "Loaded configuration");

    let state = AppState::from_config(config).await?;
    let ctx = state.call_context();

    // Ctrl+C cancels the running operation
    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, cancelling");
            interrupt.cancel();
        }
    });

    let outcome = execute(cli.command, &state.service, &ctx).await;

    // Drain queued events before exiting, whatever the outcome
    state.shutdown().await;

    match outcome {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            tracing::info!("Done");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("error: {err}");
            Ok(ExitCode::from(exit_status(&err)))
        }
    }
}
