//! Evaluate command - judge a stored analysis without any network call.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use profile_photo_core::{evaluate, AnalysisResult, Evaluation, SubmissionState, VerdictReport};
use tracing::debug;

use super::{ExitCode, OutputFormat};
use crate::config::AppConfig;
use crate::output::{ReportWriter, SubmissionOutcome};

/// Arguments for the evaluate command.
#[derive(Args, Clone)]
pub struct EvaluateArgs {
    /// Analysis JSON document as returned by the vision backend
    pub analysis: PathBuf,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    #[arg(skip)]
    config: AppConfig,
}

impl EvaluateArgs {
    /// Apply configuration file values, respecting CLI precedence.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if args.format.is_none() {
            args.format = OutputFormat::from_config(config.output.format.as_deref());
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        args.config = config.clone();
        args
    }
}

/// Run the evaluate command.
pub fn run(args: &EvaluateArgs) -> Result<ExitCode> {
    let content = std::fs::read_to_string(&args.analysis)
        .with_context(|| format!("Failed to read {}", args.analysis.display()))?;
    let analysis: AnalysisResult = serde_json::from_str(&content)
        .with_context(|| format!("{} is not an analysis document", args.analysis.display()))?;

    let policy = args.config.policy();
    debug!("Evaluating against {policy:?}");
    let verdict = evaluate(&analysis, &policy);
    let report = VerdictReport::new(&analysis, &verdict);
    let state = SubmissionState::Evaluated(Evaluation { analysis, verdict });

    let outcome = SubmissionOutcome::new(args.analysis.display().to_string(), &state, Some(report));
    ReportWriter::stdout(args.format.unwrap_or_default(), args.pretty).write(&outcome)?;
    Ok(outcome.exit_code())
}
