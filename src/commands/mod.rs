// ABOUTME: Command module aggregator for the boxrun CLI.
// ABOUTME: Re-exports run, detect, languages, suite and clean command handlers.

mod clean;
mod detect;
mod engine;
mod prompt;
mod run;
mod suite;

pub use clean::clean;
pub use detect::{detect, languages};
pub use run::{RunArgs, run};
pub use suite::{SuiteArgs, suite};
