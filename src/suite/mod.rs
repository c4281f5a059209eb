// ABOUTME: Batch mode: runs the pipeline over a fixture catalog and reports per ecosystem.
// ABOUTME: Aggregation, report persistence, fixture generation and the worker pool live here.

mod aggregate;
mod catalog;
mod fixtures;
mod report;
mod runner;

pub use aggregate::{Aggregator, EcosystemTally};
pub use catalog::{FixtureCase, PREFLIGHT_CASES, default_cases, preflight_cases};
pub use fixtures::{generate_fixtures, has_template};
pub use report::{AggregateReport, HTML_REPORT_FILENAME, JSON_REPORT_FILENAME, ProjectRecord};
pub use runner::{SuiteOptions, SuiteRunner, run_case};
