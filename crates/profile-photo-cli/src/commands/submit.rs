//! Submit command - analyze a photo and optionally make it the profile picture.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use profile_photo_adapters::{
    load_image, Adapters, CropRegion, ExecutionEnvironment, ImageSource, SiteSettings,
    DEFAULT_API_VERSION,
};
use profile_photo_core::{
    Policy, PropertyUpdate, SubmissionError, SubmissionOrchestrator, SubmittedImage,
    VerdictReport, DEFAULT_ANALYSIS_TIMEOUT,
};
use secrecy::SecretString;
use tracing::{info, warn};

use super::{ExitCode, OutputFormat};
use crate::config::AppConfig;
use crate::output::{ReportWriter, Spinner, SubmissionOutcome};

/// Environment variable holding the site access token.
pub const ACCESS_TOKEN_ENV: &str = "PROFILE_PHOTO_ACCESS_TOKEN";

/// Parse and validate a timeout in seconds.
fn parse_timeout(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a whole number of seconds"))?;
    if value == 0 {
        Err("timeout must be greater than 0".to_string())
    } else {
        Ok(value)
    }
}

/// Arguments for the submit command.
#[derive(Args, Clone)]
pub struct SubmitArgs {
    /// Image file (png, jpg, jpeg) or `data:image/...;base64,` URL
    pub image: String,

    /// Square crop region in source pixels (default: centered square)
    #[arg(long, value_name = "X,Y,W,H")]
    pub crop: Option<CropRegion>,

    /// Execution environment: local, test or production
    #[arg(long, value_name = "ENV")]
    pub environment: Option<ExecutionEnvironment>,

    /// Commit an accepted photo without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Host site URL (production only)
    #[arg(long, value_name = "URL")]
    pub site_url: Option<String>,

    /// Login name of the profile owner (production only)
    #[arg(long, value_name = "LOGIN")]
    pub account: Option<String>,

    /// Analysis timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = parse_timeout)]
    pub timeout: Option<u64>,

    /// Suppress the progress spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: AppConfig,
}

impl SubmitArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.environment = args.environment.or_else(|| config.environment());
        args.timeout = args.timeout.or(config.vision.timeout_secs.filter(|t| *t > 0));

        if args.format.is_none() {
            args.format = OutputFormat::from_config(config.output.format.as_deref());
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }

        if args.site_url.is_none() {
            args.site_url.clone_from(&config.site.url);
        }
        if args.account.is_none() {
            args.account.clone_from(&config.site.account);
        }

        args.config = config.clone();
        args
    }

    fn environment(&self) -> ExecutionEnvironment {
        self.environment.unwrap_or_default()
    }

    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    fn timeout(&self) -> Duration {
        self.timeout.map_or(DEFAULT_ANALYSIS_TIMEOUT, Duration::from_secs)
    }

    fn policy(&self) -> Policy {
        self.config.policy()
    }

    fn api_version(&self) -> &str {
        self.config
            .vision
            .api_version
            .as_deref()
            .unwrap_or(DEFAULT_API_VERSION)
    }

    fn property_update(&self) -> PropertyUpdate {
        let defaults = PropertyUpdate::default();
        let profile = &self.config.profile;
        PropertyUpdate::new(
            profile
                .property_name
                .clone()
                .unwrap_or(defaults.property_name),
            profile
                .property_value
                .clone()
                .unwrap_or(defaults.property_value),
        )
    }

    /// Site settings; the access token comes from the environment first.
    fn site_settings(&self) -> SiteSettings {
        let token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.config.site.access_token.clone());
        SiteSettings {
            url: self.site_url.clone(),
            account: self.account.clone(),
            access_token: token.map(SecretString::from),
        }
    }
}

/// Run the submit command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &SubmitArgs) -> Result<ExitCode> {
    let image = load_image(&ImageSource::parse(&args.image), args.crop)?;
    info!("Loaded {} ({} bytes)", image.source, image.len());

    let adapters =
        Adapters::for_environment(args.environment(), &args.site_settings(), args.api_version())?;

    let show_spinner = !args.quiet && std::io::stderr().is_terminal();
    let mut orchestrator = SubmissionOrchestrator::new(adapters.into_session())
        .with_observer(Arc::new(Spinner::new(show_spinner)))
        .with_analysis_timeout(args.timeout())
        .with_property_update(args.property_update());

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let outcome = runtime.block_on(drive(&mut orchestrator, image, &args.policy(), args.yes))?;

    if orchestrator.is_dismissed() {
        eprintln!("Submission cancelled");
        return Ok(ExitCode::Error);
    }

    ReportWriter::stdout(args.format(), args.pretty).write(&outcome)?;
    Ok(outcome.exit_code())
}

/// Submits, then commits an accepted photo when `commit` is set.
///
/// Ctrl-C dismisses the orchestrator; in-flight calls finish but their
/// results are discarded.
async fn drive(
    orchestrator: &mut SubmissionOrchestrator,
    image: SubmittedImage,
    policy: &Policy,
    commit: bool,
) -> Result<SubmissionOutcome> {
    let handle = orchestrator.dismiss_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.dismiss();
        }
    });

    let source = image.source.clone();
    let state = orchestrator.submit(image, policy).await;
    let accepted = state.is_accepted();
    let report = state
        .evaluation()
        .map(|e| VerdictReport::new(&e.analysis, &e.verdict));

    if accepted && commit {
        confirm(orchestrator).await?;
        return Ok(SubmissionOutcome::new(source, orchestrator.state(), report));
    }
    if accepted && !orchestrator.is_dismissed() {
        warn!("Photo accepted but not committed; pass --yes to update the profile");
    }

    orchestrator.end_session();
    Ok(SubmissionOutcome::new(source, orchestrator.state(), report))
}

/// Commits an accepted photo. A dismissal that lands before the commit is
/// not an error; `run` reports it as a cancellation.
async fn confirm(orchestrator: &mut SubmissionOrchestrator) -> Result<()> {
    match orchestrator.confirm().await {
        Ok(_) | Err(SubmissionError::Dismissed) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
