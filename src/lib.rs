// ABOUTME: Library root for boxrun - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod detect;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod runtime;
pub mod source;
pub mod stage;
pub mod suite;
pub mod types;
