//! # Votes Tabulator Engine
//! This crate applies up/down votes to voteable records and maintains their
//! tallies. Two strategies implement the same contract: an embedded one that
//! keeps voter lists on the record itself, and a relational one that keeps a
//! relation per voter and pre-aggregated counters on the record.
//!
//! A [`VotePolicy`] selects the strategy and point values once; the resulting
//! [`TabulatorHandle`] exposes `vote_up` / `vote_down`.
pub mod errors;
pub mod handle;
pub mod policy;
pub mod resolver;
pub mod tabulator;

pub use errors::TabulationError;
pub use handle::TabulatorHandle;
pub use policy::{TabulatorStrategy, VotePolicy};
pub use tabulator::{EmbeddedTabulator, RelationalTabulator, Tabulate, Tabulator};
