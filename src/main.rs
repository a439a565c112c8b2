mod batch;
mod cli;
mod config;
mod error;
mod file_list;
mod llm;
mod logging;
mod processor;
mod report;
mod selftest;
mod state_machine;
mod translator;
mod ui;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::{error, info, warn};

use batch::BatchCoordinator;
use cli::{Cli, Command};
use config::{API_KEY_ENV, HanhuaConfig};
use file_list::load_file_list;
use llm::ChatClient;
use processor::FileProcessor;
use report::Reporter;
use translator::Translator;
use ui::BatchProgress;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match HanhuaConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(Path::new(&config.log_file), cli.verbose) {
        eprintln!("Logging setup failed: {e:#}");
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Some(Command::Test) => selftest::run(&config).await,
        None => run_translation(&config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("translation task failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Load the list, translate every file and write the report.
///
/// A missing or empty list is logged and ends the run normally.
async fn run_translation(config: &HanhuaConfig) -> Result<()> {
    let paths = match load_file_list(Path::new(&config.files_list)) {
        Ok(paths) => paths,
        Err(e) => {
            error!("{e:#}");
            return Ok(());
        }
    };
    if paths.is_empty() {
        error!("no files to translate");
        return Ok(());
    }
    if config.api_key.is_empty() {
        bail!("API key is not set; add api_key to the config file or export {API_KEY_ENV}");
    }

    info!(
        base_url = %config.base_url,
        model = %config.model,
        concurrency = config.max_concurrent,
        "using configuration"
    );

    // The coordinator owns the HTTP client; its pool is released on every return path.
    let client = ChatClient::from_config(config)?;
    let coordinator = BatchCoordinator::new(
        FileProcessor::new(Translator::new(client, config)),
        config.max_concurrent,
        config.schedule,
    )
    .with_progress(BatchProgress::start(paths.len()));

    let mut run = tokio::select! {
        run = coordinator.run(&paths) => run,
        _ = tokio::signal::ctrl_c() => {
            warn!("translation interrupted by user");
            return Ok(());
        }
    };

    Reporter::from_config(config).report(&run.outcomes, &mut run.stats)?;
    Ok(())
}
