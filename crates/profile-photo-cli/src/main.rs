//! Profile Photo CLI - policy-gated profile picture submission.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Commands::Submit(args) => {
            let args = commands::submit::SubmitArgs::with_config(args, &config);
            commands::submit::run(&args).unwrap_or_else(|e| {
                eprintln!("error: {e:#}");
                ExitCode::Error
            })
        }
        Commands::Evaluate(args) => {
            let args = commands::evaluate::EvaluateArgs::with_config(args, &config);
            commands::evaluate::run(&args).unwrap_or_else(|e| {
                eprintln!("error: {e:#}");
                ExitCode::Error
            })
        }
    };

    exit_code.into()
}
