mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use catalog_probe::{Scenario, SuiteConfig, SuiteRunner};
use cli::{Cli, Commands, TargetArgs};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match cli.verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match execute(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether every case passed.
async fn execute(command: Commands) -> Result<bool> {
    match command {
        Commands::Run {
            target,
            positive_coverage,
            negative_coverage,
            scenarios,
            format,
            report,
        } => {
            let mut overrides = target.overrides();
            overrides.positive_coverage = positive_coverage;
            overrides.negative_coverage = negative_coverage;
            let config = load_config(&target)?.with_overrides(overrides);

            let runner = SuiteRunner::new(config)?;
            let selection = if scenarios.is_empty() {
                Scenario::ALL.to_vec()
            } else {
                scenarios
            };

            let run_report = runner.run(&selection).await.map_err(|err| {
                if err.is_session_fatal() {
                    anyhow::Error::new(err).context("session aborted: nothing to test")
                } else {
                    err.into()
                }
            })?;

            println!("{}", run_report.render(format)?);
            if let Some(path) = report {
                run_report
                    .write_to(&path, format)
                    .with_context(|| format!("failed to write report to {}", path.display()))?;
            }
            Ok(run_report.success())
        }
        Commands::Sample { target, percentage } => {
            let config = load_config(&target)?.with_overrides(target.overrides());
            let runner = SuiteRunner::new(config)?;
            let seed = runner.session_seed();
            let ids = runner.sample(percentage, seed).await?;

            let listed: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
            println!("{}", listed.join(" "));
            eprintln!("seed {seed}, {} ids from {}", ids.len(), runner.base_url());
            Ok(true)
        }
        Commands::Scenarios => {
            for scenario in Scenario::ALL {
                println!("{:<22}{}", scenario.name(), scenario.description());
            }
            Ok(true)
        }
    }
}

fn load_config(target: &TargetArgs) -> Result<SuiteConfig> {
    match &target.config {
        Some(path) => SuiteConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => Ok(SuiteConfig::default()),
    }
}
