//! Configuration module for the votes tabulator.
//! Reads settings from the environment and wires the store and engine.
mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{LogFormat, TabulatorConfig};
