use anyhow::{Context, Result};
use clap::Parser;
use lim_common::observability::init_logging;
use lim_config::{LimConfig, LimConfigLoader};
use lim_wiki::SummaryExtractor;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

use cli::{Cli, Command};

mod cli;
mod commands;

fn load_config(cli: &Cli) -> Result<LimConfig> {
    let loader = match &cli.config {
        Some(path) => LimConfigLoader::new().with_file(path),
        None => LimConfigLoader::new().with_default_files(),
    };
    loader.load().context("loading configuration")
}

async fn run(cli: Cli) -> Result<()> {
    // 1) Config (env wins over files)
    let cfg = load_config(&cli)?;

    // 2) Logging
    let mut log_cfg = cfg.logging.to_log_config();
    log_cfg.emit_stderr |= cli.verbose;
    let log_path = init_logging(log_cfg)?;
    tracing::debug!(log = %log_path.display(), base_url = %cfg.lookup.base_url, "lim.start");

    // 3) Ctrl-C cancels an in-flight lookup
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    match cli.command {
        Command::Lookup { json, query } => {
            let extractor = SummaryExtractor::from_config(&cfg.lookup)?;
            commands::lookup(&extractor, &query.join(" "), json, &cancel).await
        }
        Command::Insert { file, select, query } => {
            let extractor = SummaryExtractor::from_config(&cfg.lookup)?;
            commands::insert(&extractor, &file, select, &query, &cancel).await
        }
        Command::New { file, force } => commands::new_document(&file, force),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.downcast_ref::<commands::Reported>().is_none() {
                tracing::error!(error = %format!("{err:#}"), "lim.failed");
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
