//! Votes Tabulator
//!
//! Configuration loading, dependency wiring and the command-line surface
//! around the tabulation engine.

pub mod cli;
pub mod config;
pub mod errors;

pub use config::{Dependencies, LogFormat, TabulatorConfig};
pub use errors::TabulatorAppError;
