//! CLI command definitions and handlers.

pub mod evaluate;
pub mod submit;

use clap::{Parser, Subcommand, ValueEnum};

/// Profile Photo - submit a profile picture gated by image analysis
#[derive(Parser)]
#[command(name = "profile-photo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a photo and, with --yes, make it the profile picture
    Submit(submit::SubmitArgs),
    /// Evaluate a stored analysis JSON document against the policy
    Evaluate(evaluate::EvaluateArgs),
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable checklist
    #[default]
    Text,
    /// Single JSON object
    Json,
}

impl OutputFormat {
    /// Parses a config file value.
    fn from_config(value: Option<&str>) -> Option<Self> {
        match value? {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Photo accepted (and committed when requested).
    Success = 0,
    /// Photo rejected by the policy.
    Rejected = 1,
    /// Analysis failed, commit failed or bad input.
    Error = 2,
    /// Vision configuration is missing.
    ConfigMissing = 3,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
