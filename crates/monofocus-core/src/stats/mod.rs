//! Session analytics for monofocus.
//!
//! Pure functions over history snapshots: the per-session productivity
//! score, consecutive-day streaks, and the progress summary that folds
//! both into reporting numbers.

mod progress;
mod scoring;
mod streak;

pub use progress::{aggregate, daily_focus, OutcomeCounts, ProgressAggregator, ProgressStats};
pub use scoring::{
    completion_score, duration_score, focus_score, score, score_breakdown, ScoreBreakdown,
    ScoreTerm, COMPLETION_WEIGHT, DURATION_WEIGHT, FOCUS_WEIGHT,
};
pub use streak::{current_streak, longest_streak};
