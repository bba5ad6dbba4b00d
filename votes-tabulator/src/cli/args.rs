//! CLI argument definitions using clap
//!
//! Commands:
//! - votes-tabulator up <voter> <voteable>
//! - votes-tabulator down <voter> <voteable>
//! - votes-tabulator cast <voter> <voteable> <up|down>
//! - votes-tabulator tally <voteable>
//! - votes-tabulator migrate

use clap::{Parser, Subcommand};

/// Up/down vote tabulation over PostgreSQL
#[derive(Parser, Debug)]
#[command(name = "votes-tabulator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Cast an up-vote and print the new tally
    Up {
        /// Voter identifier, e.g. users/42
        voter: String,
        /// Voteable identifier as <collection>/<key>
        voteable: String,
    },

    /// Cast a down-vote and print the new tally
    Down {
        voter: String,
        voteable: String,
    },

    /// Cast a vote given by name
    Cast {
        voter: String,
        voteable: String,
        /// `up` or `down`
        vote_type: String,
    },

    /// Print the current tally without voting
    Tally { voteable: String },

    /// Create the vote tables
    Migrate,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
