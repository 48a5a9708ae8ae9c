use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::Result;

use super::CaseResult;

/// Output format for run reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Summary report for a session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Seed that reproduces this session's samples.
    pub seed: u64,
    pub base_url: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<CaseResult>,
}

impl RunReport {
    pub fn new(seed: u64, base_url: String, results: Vec<CaseResult>, duration_ms: u64) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            seed,
            base_url,
            total: results.len(),
            passed,
            failed: results.len() - passed,
            duration_ms,
            results,
        }
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// One line per case, failure messages indented below, then a summary.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            let label = if result.passed { "PASS" } else { "FAIL" };
            let _ = writeln!(
                out,
                "{label} {}[{}] ({} ms)",
                result.scenario, result.case, result.duration_ms
            );
            if let Some(message) = &result.message {
                for line in message.lines() {
                    let _ = writeln!(out, "    {line}");
                }
            }
        }
        let _ = writeln!(
            out,
            "\n{} cases: {} passed, {} failed in {} ms (seed {}, {})",
            self.total, self.passed, self.failed, self.duration_ms, self.seed, self.base_url
        );
        out
    }

    pub fn write_to(&self, path: &Path, format: OutputFormat) -> Result<()> {
        fs::write(path, self.render(format)?)?;
        Ok(())
    }
}
