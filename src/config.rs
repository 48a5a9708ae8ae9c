//! Suite configuration.
//!
//! A run is described by a [`SuiteConfig`], read from TOML and then adjusted
//! by command-line overrides. Named environments (dev / staging / prod) can
//! swap the base URL and supply variables for `{{variable}}` interpolation:
//!
//! ```toml
//! base_url = "{{host}}/products"
//! seed = 7
//!
//! [variables]
//! host = "https://fakestoreapi.com"
//!
//! [environments.local]
//! variables = { host = "http://127.0.0.1:3000" }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::expected::ExpectedValues;

pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com/products";
pub const DEFAULT_POSITIVE_COVERAGE: f64 = 100.0;
pub const DEFAULT_NEGATIVE_COVERAGE: f64 = 1.0;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Collection endpoint; single items live at `{base_url}/{id}`.
    pub base_url: String,
    /// Percentage of the catalog checked by the structure and data type cases.
    pub positive_coverage: f64,
    /// Percentage of the catalog checked by the wrong-method cases.
    pub negative_coverage: f64,
    pub seed: Option<u64>,
    pub active_environment: Option<String>,
    pub variables: BTreeMap<String, String>,
    pub environments: BTreeMap<String, EnvironmentConfig>,
    pub transport: TransportConfig,
    pub expected: ExpectedValues,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            positive_coverage: DEFAULT_POSITIVE_COVERAGE,
            negative_coverage: DEFAULT_NEGATIVE_COVERAGE,
            seed: None,
            active_environment: None,
            variables: BTreeMap::new(),
            environments: BTreeMap::new(),
            transport: TransportConfig::default(),
            expected: ExpectedValues::default(),
        }
    }
}

/// A named environment; its values override the top-level ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub base_url: Option<String>,
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Per-request timeout; 0 disables it.
    pub timeout_ms: u64,
    /// Headers sent with every request.
    pub headers: BTreeMap<String, String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            headers: BTreeMap::new(),
        }
    }
}

/// Values supplied on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub environment: Option<String>,
    pub base_url: Option<String>,
    pub seed: Option<u64>,
    pub positive_coverage: Option<f64>,
    pub negative_coverage: Option<f64>,
    pub timeout_ms: Option<u64>,
}

impl SuiteConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            Error::Config(format!("Failed to read config file `{}`: {err}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(environment) = overrides.environment {
            self.active_environment = Some(environment);
        }
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(coverage) = overrides.positive_coverage {
            self.positive_coverage = coverage;
        }
        if let Some(coverage) = overrides.negative_coverage {
            self.negative_coverage = coverage;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.transport.timeout_ms = timeout_ms;
        }
        self
    }

    fn environment(&self) -> Result<Option<&EnvironmentConfig>> {
        match &self.active_environment {
            None => Ok(None),
            Some(name) => self
                .environments
                .get(name)
                .map(Some)
                .ok_or_else(|| Error::Config(format!("Unknown environment `{name}`"))),
        }
    }

    /// Merge global variables with the active environment's.
    /// Environment variables override globals; empty keys are skipped.
    pub fn variable_map(&self) -> Result<BTreeMap<String, String>> {
        let mut variables = BTreeMap::new();

        for (key, value) in &self.variables {
            if !key.is_empty() {
                variables.insert(key.clone(), value.clone());
            }
        }

        if let Some(env) = self.environment()? {
            for (key, value) in &env.variables {
                if !key.is_empty() {
                    variables.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(variables)
    }

    /// The collection endpoint after environment selection and interpolation.
    pub fn resolve_base_url(&self) -> Result<String> {
        let template = self
            .environment()?
            .and_then(|env| env.base_url.as_deref())
            .unwrap_or(&self.base_url);

        let resolved = interpolate(template, &self.variable_map()?);
        if resolved.contains("{{") {
            return Err(Error::Config(format!(
                "Unresolved variable in base URL `{resolved}`"
            )));
        }

        Ok(resolved.trim_end_matches('/').to_string())
    }

    pub fn validate(&self) -> Result<()> {
        let base_url = self.resolve_base_url()?;
        if base_url.is_empty() {
            return Err(Error::Config("Base URL cannot be empty".into()));
        }
        crate::http::client::parse_url(&base_url)?;

        check_coverage("positive_coverage", self.positive_coverage)?;
        check_coverage("negative_coverage", self.negative_coverage)?;

        if self.expected.invalid_ids.is_empty() {
            return Err(Error::Config("Invalid id set cannot be empty".into()));
        }

        if !self.expected.product_keys.iter().any(|key| key == "id") {
            return Err(Error::Config("`expected.product_keys` must include `id`".into()));
        }

        Ok(())
    }
}

fn check_coverage(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 100.0 {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "`{name}` must be within (0, 100], got {value}"
        )))
    }
}

/// Interpolate `{{key}}` placeholders using the provided variable map.
///
/// Values may reference other variables; substitution repeats until the text
/// stops changing, bounded by the number of variables so cycles terminate.
/// Unknown placeholders are left untouched.
pub fn interpolate(input: &str, variables: &BTreeMap<String, String>) -> String {
    let mut result = input.to_string();
    for _ in 0..=variables.len() {
        let mut next = result.clone();
        for (key, value) in variables {
            next = next.replace(&format!("{{{{{key}}}}}"), value);
        }
        if next == result {
            break;
        }
        result = next;
    }
    result
}
