//! Command-line surface: argument parsing and command dispatch.
mod args;

pub use args::{Cli, Command};

use tracing::info;

use crate::config::Dependencies;
use crate::errors::TabulatorAppError;

/// Runs one command and returns the line to print on success.
pub async fn run(command: &Command, deps: &Dependencies) -> Result<String, TabulatorAppError> {
    let result = match command {
        Command::Up { voter, voteable } => deps.tabulator.vote_up(voter, voteable).await?,
        Command::Down { voter, voteable } => deps.tabulator.vote_down(voter, voteable).await?,
        Command::Cast {
            voter,
            voteable,
            vote_type,
        } => deps.tabulator.cast(voter, voteable, vote_type).await?,
        Command::Tally { voteable } => deps.tabulator.tally(voteable).await?,
        Command::Migrate => {
            deps.store.migrate().await?;
            info!("Migrations applied");
            return Ok(serde_json::json!({ "migrated": true }).to_string());
        }
    };

    Ok(serde_json::to_string(&result)?)
}
