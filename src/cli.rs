//! CLI argument definitions

use std::path::PathBuf;

use clap::Parser;

/// Default change request when the user gives none
pub const DEFAULT_REQUEST: &str = "Suggest two general improvements to my resume. Keep each suggested improvement small.";

/// resumeloop - LLM-assisted resume rewriting
#[derive(Debug, Parser)]
#[command(
    name = "resumeloop",
    about = "Rewrite a resume by applying SEARCH/REPLACE suggestions from a language model",
    version
)]
pub struct Cli {
    /// Path to the resume file (plain text, LaTeX, or HTML)
    #[arg(value_name = "RESUME")]
    pub resume: PathBuf,

    /// Change request to send to the model
    #[arg(short, long, default_value = DEFAULT_REQUEST)]
    pub request: String,

    /// Write the rewritten resume here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Override the session's model request budget
    #[arg(long, value_name = "N")]
    pub max_requests: Option<u32>,

    /// Also echo system and corrective messages
    #[arg(short, long)]
    pub verbose: bool,
}
