//! # Votes Tabulator Shared
//! This crate defines the data structures shared across the votes tabulator
//! ecosystem: vote values, voteable identifiers, point configuration, voter
//! lists, aggregated counters, vote relations and tabulated results.
pub mod types;
