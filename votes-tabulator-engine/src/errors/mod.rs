//! Error types for the votes tabulator engine.
mod tabulation;

pub use tabulation::TabulationError;
