//! # CLI Support
//!
//! Command-line interface for running the catalog suite in CI pipelines.
//! Exit code is non-zero when any case fails or the session aborts.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use catalog_probe::{ConfigOverrides, OutputFormat, Scenario};

#[derive(Parser)]
#[command(name = "catalog-probe")]
#[command(about = "Conformance checks for product catalog APIs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the scenario suite and print a report
    Run {
        #[command(flatten)]
        target: TargetArgs,

        /// Percentage of items for structure and data type checks
        #[arg(long)]
        positive_coverage: Option<f64>,

        /// Percentage of items for wrong-method checks
        #[arg(long)]
        negative_coverage: Option<f64>,

        /// Scenario to run (repeatable; default: all)
        #[arg(short, long = "scenario", value_enum)]
        scenarios: Vec<Scenario>,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also write the report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Print a sampled set of item identifiers
    Sample {
        #[command(flatten)]
        target: TargetArgs,

        /// Percentage of items to select
        #[arg(short, long, default_value = "100")]
        percentage: f64,
    },

    /// List available scenarios
    Scenarios,
}

/// Where to point the suite and how to seed it.
#[derive(Args)]
pub struct TargetArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Named environment from the configuration file
    #[arg(short, long)]
    pub env: Option<String>,

    /// Collection endpoint URL (overrides configuration)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Seed for identifier sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Per-request timeout in milliseconds (0 disables)
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

impl TargetArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            environment: self.env.clone(),
            base_url: self.base_url.clone(),
            seed: self.seed,
            timeout_ms: self.timeout_ms,
            ..Default::default()
        }
    }
}
