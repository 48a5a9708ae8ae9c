//! # Testing & Assertions
//!
//! Scenario families, per-case results and the session runner.
//!
//! A session samples identifiers once, then runs every selected scenario for
//! each of its parameters. A failed case is recorded and the session moves on;
//! only a failure to sample (see [`crate::sampler::get_ids`]) aborts it.

pub mod report;
pub mod runner;

use clap::ValueEnum;
use serde::Serialize;
use std::fmt::{self, Display};

use crate::error::Error;
use crate::http::{HttpResponse, RequestInput};
use crate::sampler::ItemId;

pub use report::{OutputFormat, RunReport};
pub use runner::SuiteRunner;

/// The four scenario families checked against a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Scenario {
    /// Valid id: status, content type, schema keys, id match.
    StructureSanity,
    /// Valid id: field types and values, reachable image.
    DataTypeIntegrity,
    /// Malformed or unknown ids are rejected with an empty body.
    InvalidIds,
    /// POST to a single item is refused.
    WrongMethod,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::StructureSanity,
        Scenario::DataTypeIntegrity,
        Scenario::InvalidIds,
        Scenario::WrongMethod,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::StructureSanity => "structure_sanity",
            Scenario::DataTypeIntegrity => "data_type_integrity",
            Scenario::InvalidIds => "invalid_ids",
            Scenario::WrongMethod => "wrong_method",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Scenario::StructureSanity => "valid ids return 200, JSON content type, all schema keys and the requested id",
            Scenario::DataTypeIntegrity => "valid ids return well-typed fields and a reachable image URL",
            Scenario::InvalidIds => "unknown or malformed ids return 404/400 with an empty body",
            Scenario::WrongMethod => "POST to a single item returns 405 with the expected error text",
        }
    }

    /// Whether the scenario is parametrized by the positive sample set.
    pub fn uses_positive_sample(self) -> bool {
        matches!(self, Scenario::StructureSanity | Scenario::DataTypeIntegrity)
    }
}

impl Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameter a single case runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseParam {
    Id(ItemId),
    Raw(String),
}

impl Display for CaseParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseParam::Id(id) => write!(f, "{id}"),
            CaseParam::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Outcome of one scenario run with one parameter.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub scenario: Scenario,
    pub case: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub duration_ms: u64,
}

/// A violated expectation. Terminal for its case only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
}

pub type CheckResult<T = ()> = std::result::Result<T, Failure>;

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Failure annotated with what was sent and what came back.
    ///
    /// The body is pretty-printed JSON when the status matched the OK status,
    /// raw text otherwise.
    pub fn with_response(
        message: impl Display,
        request: &RequestInput,
        expected_status: impl Display,
        response: &HttpResponse,
        status_ok: u16,
    ) -> Self {
        let body = if response.status == status_ok {
            response
                .json()
                .ok()
                .and_then(|value| serde_json::to_string_pretty(&value).ok())
                .unwrap_or_else(|| response.preview(BODY_PREVIEW_CHARS))
        } else {
            response.preview(BODY_PREVIEW_CHARS)
        };

        let status = if response.status_text.is_empty() {
            response.status.to_string()
        } else {
            format!("{} {}", response.status, response.status_text)
        };

        Self::new(format!(
            "{message}\n  sent: {request}\n  expected status: {expected_status}\n  actual status: {status} ({} ms, {} bytes)\n  response body: {body}",
            response.duration_ms, response.size_bytes
        ))
    }
}

const BODY_PREVIEW_CHARS: usize = 512;

impl Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Failure::new(err.to_string())
    }
}

/// Fail with `message` unless `condition` holds.
pub fn check(condition: bool, message: impl FnOnce() -> String) -> CheckResult {
    if condition {
        Ok(())
    } else {
        Err(Failure::new(message()))
    }
}
