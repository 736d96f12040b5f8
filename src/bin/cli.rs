//! Grabber CLI
//!
//! Watches a public channel and claims every red packet code posted there.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use grabber::{
    error::Result,
    models::Config,
    notify::LogNotifier,
    pipeline::{PollLoop, Recovery, SessionEnd, extract_codes, supervise},
    services::{ChannelFetcher, PageFetcher},
    utils::http,
};

/// grabber - red packet code watcher
#[derive(Parser, Debug)]
#[command(
    name = "grabber",
    version,
    about = "Watches a channel for red packet codes and claims them"
)]
struct Cli {
    /// Path to the JSON (or TOML) config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watch the channel and claim codes until stopped
    Run,

    /// Validate the config file
    Validate,

    /// Fetch the latest message once and show its codes without claiming
    Peek,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Ask until the operator answers R or E.
fn prompt_recovery() -> Result<Recovery> {
    let stdin = io::stdin();
    loop {
        print!("Press R to restart or E to exit: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(Recovery::Exit);
        }
        match line.trim().to_lowercase().as_str() {
            "r" => return Ok(Recovery::Restart),
            "e" => return Ok(Recovery::Exit),
            _ => println!("Invalid input. Please press R to restart or E to exit."),
        }
    }
}

fn log_totals(totals: &[(String, f64)]) {
    if totals.is_empty() {
        log::info!("Nothing claimed this session");
        return;
    }
    for (token, total) in totals {
        log::info!("Total {token} claimed: {total:.8}");
    }
}

/// Run the agent, offering restart after every fatal error.
///
/// The config is re-read on every start so that updated credentials apply.
async fn run(config_path: &Path) -> Result<()> {
    supervise(
        || {
            let config = Config::load_validated(config_path)?;
            log::info!("Loaded configuration from {}", config_path.display());
            PollLoop::from_config(&config, Arc::new(LogNotifier))
        },
        |end: SessionEnd| async move {
            // The cause was already reported through the notifier.
            log_totals(&end.totals);
            match tokio::task::spawn_blocking(prompt_recovery).await {
                Ok(recovery) => recovery,
                Err(e) => Err(io::Error::other(e).into()),
            }
        },
    )
    .await
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            log::info!("grabber starting...");
            run(&cli.config).await?;
        }

        Command::Validate => {
            log::info!("Validating {}...", cli.config.display());
            if let Err(e) = Config::load_validated(&cli.config) {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }

        Command::Peek => {
            let config = Config::load_validated(&cli.config)?;
            let client = http::create_async_client(&config.http)?;
            let fetcher = ChannelFetcher::new(&config, client)?;

            let text = fetcher.fetch_latest().await?;
            if text.is_empty() {
                log::info!("No message found at {}", fetcher.url());
            } else {
                log::info!("Latest message:\n{text}");
                let codes = extract_codes(&text);
                if codes.is_empty() {
                    log::info!("No codes in it");
                } else {
                    log::info!("Codes: {}", codes.join(", "));
                }
            }
        }
    }

    Ok(())
}
