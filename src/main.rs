//! resumeloop - LLM-assisted resume rewriting
//!
//! CLI entry point: read the resume, run one reflection session, write the
//! rewritten document.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use resumeloop::cli::Cli;
use resumeloop::config::Config;
use resumeloop::console::Console;
use resumeloop::llm::create_client;
use resumeloop::prompts;
use resumeloop::session::Session;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("resumeloop")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("resumeloop.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    let resume = fs::read_to_string(&cli.resume)
        .context(format!("Failed to read resume from {}", cli.resume.display()))?;

    let llm = create_client(&config.llm)?;
    let console = Console::new(cli.verbose);
    let max_requests = cli.max_requests.unwrap_or(config.session.max_requests);
    debug!(%max_requests, model = %config.llm.model, "main: starting session");

    let mut session = Session::new(llm, console, max_requests, config.llm.max_tokens);
    let initial = prompts::initial_messages(&resume, &cli.request)?;

    match session.run(&resume, initial).await {
        Ok(rewritten) => {
            info!(rounds = %session.rounds_used(), "main: session complete");
            match cli.output {
                Some(path) => {
                    fs::write(&path, &rewritten).context(format!("Failed to write {}", path.display()))?;
                    eprintln!("Wrote rewritten resume to {}", path.display());
                }
                None => print!("{rewritten}"),
            }
            Ok(())
        }
        Err(error) => {
            console.fatal(&error);
            std::process::exit(1);
        }
    }
}
