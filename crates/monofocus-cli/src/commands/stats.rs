use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use monofocus_core::{current_streak, longest_streak, Config, FocusSession, ProgressAggregator};

use super::{print_json, read_json_or_default, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Summarize a session history
    Summary {
        /// JSON file holding an array of sessions
        #[arg(long)]
        history: PathBuf,
        /// Evaluate as of this RFC 3339 instant instead of now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Current and longest streak of completed sessions
    Streak {
        /// JSON file holding an array of sessions
        #[arg(long)]
        history: PathBuf,
        /// Evaluate as of this RFC 3339 instant instead of now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
}

pub fn run(action: StatsAction) -> CliResult {
    match action {
        StatsAction::Summary { history, at } => {
            let config = Config::load_or_default();
            let sessions: Vec<FocusSession> = read_json_or_default(&history)?;
            let aggregator = ProgressAggregator::from_config(&config.analytics);
            print_json(&aggregator.aggregate(&sessions, at.unwrap_or_else(Utc::now)))?;
        }
        StatsAction::Streak { history, at } => {
            let sessions: Vec<FocusSession> = read_json_or_default(&history)?;
            let now = at.unwrap_or_else(Utc::now);
            print_json(&serde_json::json!({
                "current": current_streak(&sessions, now),
                "longest": longest_streak(&sessions),
            }))?;
        }
    }
    Ok(())
}
