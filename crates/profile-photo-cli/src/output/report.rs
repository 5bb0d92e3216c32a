//! Text and JSON rendering of submission outcomes.

use std::io::{self, Write};

use anyhow::Result;
use profile_photo_core::{SubmissionState, VerdictReport};
use serde::Serialize;

use crate::commands::{ExitCode, OutputFormat};

/// Final result of one CLI run.
#[derive(Debug, Serialize)]
pub struct SubmissionOutcome {
    /// Image or analysis document the run was about.
    pub source: String,
    /// Final orchestrator state name.
    pub state: &'static str,
    /// The photo is now the profile picture.
    pub committed: bool,
    /// Verdict breakdown, when analysis completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<VerdictReport>,
    /// Failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Message for the end user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    exit_code: ExitCode,
}

impl SubmissionOutcome {
    /// Builds the outcome for a final state.
    #[must_use]
    pub fn new(source: String, state: &SubmissionState, report: Option<VerdictReport>) -> Self {
        let failure = state.failure();
        Self {
            source,
            state: state.name(),
            committed: matches!(state, SubmissionState::Committed),
            report,
            error: failure.map(ToString::to_string),
            message: failure.map(profile_photo_core::SubmissionError::user_message),
            exit_code: exit_code_for(state),
        }
    }

    /// Process exit code for this outcome.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        self.exit_code
    }
}

fn exit_code_for(state: &SubmissionState) -> ExitCode {
    match state {
        SubmissionState::Committed => ExitCode::Success,
        SubmissionState::Evaluated(e) if e.verdict.is_valid => ExitCode::Success,
        SubmissionState::Evaluated(_) => ExitCode::Rejected,
        SubmissionState::Blocked(_) => ExitCode::ConfigMissing,
        SubmissionState::Idle
        | SubmissionState::Analyzing
        | SubmissionState::Committing
        | SubmissionState::AnalysisFailed(_)
        | SubmissionState::CommitFailed(_) => ExitCode::Error,
    }
}

/// Writes outcomes to stdout (or any writer).
pub struct ReportWriter {
    writer: Box<dyn Write>,
    format: OutputFormat,
    pretty: bool,
}

impl ReportWriter {
    /// Creates a writer to stdout.
    #[must_use]
    pub fn stdout(format: OutputFormat, pretty: bool) -> Self {
        Self::new(Box::new(io::stdout()), format, pretty)
    }

    /// Creates a writer to `writer`.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Writes one outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write(&mut self, outcome: &SubmissionOutcome) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = if self.pretty {
                    serde_json::to_string_pretty(outcome)?
                } else {
                    serde_json::to_string(outcome)?
                };
                writeln!(self.writer, "{json}")?;
            }
            OutputFormat::Text => write_text(&mut self.writer, outcome)?,
        }
        self.writer.flush()?;
        Ok(())
    }
}

fn write_text(w: &mut dyn Write, outcome: &SubmissionOutcome) -> Result<()> {
    writeln!(w, "Photo: {}", outcome.source)?;

    if let Some(report) = &outcome.report {
        if let Some(caption) = &report.caption {
            writeln!(w, "Caption: {caption}")?;
        }
        match (report.estimated_age, &report.gender) {
            (Some(age), Some(gender)) => writeln!(w, "Estimated age: {age} ({gender})")?,
            (Some(age), None) => writeln!(w, "Estimated age: {age}")?,
            _ => {}
        }
        writeln!(w)?;
        for item in &report.checklist {
            let mark = if item.passed { "PASS" } else { "FAIL" };
            writeln!(w, "  [{mark}] {}: {}", item.label, item.value)?;
        }
        writeln!(w)?;
    }

    let summary = match outcome.state {
        "committed" => "profile picture updated".to_string(),
        "valid" => "photo meets every requirement".to_string(),
        "invalid" => "photo does not meet the requirements".to_string(),
        _ => outcome
            .message
            .clone()
            .unwrap_or_else(|| outcome.state.to_string()),
    };
    writeln!(w, "Result: {summary}")?;
    Ok(())
}
