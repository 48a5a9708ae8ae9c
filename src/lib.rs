//! Black-box conformance checks for FakeStore-style product catalog APIs.
//!
//! A session samples item identifiers from the collection endpoint, then runs
//! four scenario families against the single-item endpoint:
//!
//! - [`Scenario::StructureSanity`]
//! - [`Scenario::DataTypeIntegrity`]
//! - [`Scenario::InvalidIds`]
//! - [`Scenario::WrongMethod`]
//!
//! ```no_run
//! # async fn demo() -> catalog_probe::Result<()> {
//! use catalog_probe::{Scenario, SuiteConfig, SuiteRunner};
//!
//! let runner = SuiteRunner::new(SuiteConfig::default())?;
//! let report = runner.run(&Scenario::ALL).await?;
//! println!("{}", report.render_text());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod expected;
pub mod http;
pub mod sampler;
pub mod scenarios;
pub mod testing;

pub use config::{ConfigOverrides, SuiteConfig};
pub use error::{Error, Result};
pub use expected::ExpectedValues;
pub use sampler::{ItemId, get_ids, sample_ids};
pub use testing::{CaseResult, OutputFormat, RunReport, Scenario, SuiteRunner};
