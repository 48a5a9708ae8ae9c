use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::SuiteConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::sampler::{self, ItemId};
use crate::scenarios::{self, ScenarioContext};

use super::report::RunReport;
use super::{CaseParam, CaseResult, CheckResult, Failure, Scenario};

/// Runs scenario families against one catalog, one case at a time.
#[derive(Debug)]
pub struct SuiteRunner {
    config: SuiteConfig,
    base_url: String,
    client: HttpClient,
}

impl SuiteRunner {
    /// Validate `config` and build the transport.
    pub fn new(config: SuiteConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config.resolve_base_url()?;
        let client = HttpClient::new(&config.transport)?;
        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// The configured seed, or a fresh one drawn from the OS.
    pub fn session_seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(rand::random)
    }

    /// Sample `percentage` of the catalog with a seeded RNG.
    pub async fn sample(&self, percentage: f64, seed: u64) -> Result<Vec<ItemId>> {
        let mut rng = StdRng::seed_from_u64(seed);
        sampler::get_ids(&self.client, &self.base_url, percentage, &mut rng).await
    }

    /// Run the selected scenarios. Duplicate selections run once.
    ///
    /// Sampling errors abort the session; case failures are collected in the
    /// returned report.
    pub async fn run(&self, selection: &[Scenario]) -> Result<RunReport> {
        let started = Instant::now();
        let scenarios = dedup(selection);
        let seed = self.session_seed();
        let mut rng = StdRng::seed_from_u64(seed);
        info!(seed, base_url = %self.base_url, "starting catalog session");

        let positive_ids = if scenarios.iter().any(|s| s.uses_positive_sample()) {
            sampler::get_ids(
                &self.client,
                &self.base_url,
                self.config.positive_coverage,
                &mut rng,
            )
            .await?
        } else {
            Vec::new()
        };

        let negative_ids = if scenarios.contains(&Scenario::WrongMethod) {
            sampler::get_ids(
                &self.client,
                &self.base_url,
                self.config.negative_coverage,
                &mut rng,
            )
            .await?
        } else {
            Vec::new()
        };

        let mut results = Vec::new();
        for scenario in scenarios {
            let params: Vec<CaseParam> = match scenario {
                Scenario::StructureSanity | Scenario::DataTypeIntegrity => {
                    positive_ids.iter().copied().map(CaseParam::Id).collect()
                }
                Scenario::WrongMethod => negative_ids.iter().copied().map(CaseParam::Id).collect(),
                Scenario::InvalidIds => self
                    .config
                    .expected
                    .invalid_ids
                    .iter()
                    .cloned()
                    .map(CaseParam::Raw)
                    .collect(),
            };

            for param in params {
                results.push(self.run_case(scenario, &param).await);
            }
        }

        let report = RunReport::new(
            seed,
            self.base_url.clone(),
            results,
            started.elapsed().as_millis() as u64,
        );
        info!(
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            "catalog session finished"
        );
        Ok(report)
    }

    /// Run one scenario with one parameter; never fails the session.
    pub async fn run_case(&self, scenario: Scenario, param: &CaseParam) -> CaseResult {
        let started = Instant::now();
        let outcome = self.dispatch(scenario, param).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => CaseResult {
                scenario,
                case: param.to_string(),
                passed: true,
                message: None,
                duration_ms,
            },
            Err(failure) => {
                warn!(%scenario, case = %param, "{}", failure.message);
                CaseResult {
                    scenario,
                    case: param.to_string(),
                    passed: false,
                    message: Some(failure.message),
                    duration_ms,
                }
            }
        }
    }

    async fn dispatch(&self, scenario: Scenario, param: &CaseParam) -> CheckResult {
        let ctx = ScenarioContext {
            client: &self.client,
            base_url: &self.base_url,
            expected: &self.config.expected,
        };

        match (scenario, param) {
            (Scenario::StructureSanity, CaseParam::Id(id)) => {
                scenarios::structure_sanity(ctx, *id).await
            }
            (Scenario::DataTypeIntegrity, CaseParam::Id(id)) => {
                scenarios::data_type_integrity(ctx, *id).await
            }
            (Scenario::WrongMethod, CaseParam::Id(id)) => scenarios::wrong_method(ctx, *id).await,
            (Scenario::InvalidIds, param) => scenarios::invalid_id(ctx, &param.to_string()).await,
            (scenario, CaseParam::Raw(raw)) => Err(Failure::new(format!(
                "{scenario} needs an integer id, got `{raw}`"
            ))),
        }
    }
}

fn dedup(selection: &[Scenario]) -> Vec<Scenario> {
    let mut scenarios = Vec::with_capacity(selection.len());
    for scenario in selection {
        if !scenarios.contains(scenario) {
            scenarios.push(*scenario);
        }
    }
    scenarios
}
