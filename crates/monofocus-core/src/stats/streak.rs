//! Consecutive-day streaks over completed sessions.
//!
//! Only `Completed` sessions count. Two sessions belong to the same streak
//! when they start at most one whole day (24h, floored) apart; the current
//! streak additionally has to reach `now` under the same rule.

use chrono::{DateTime, Utc};

use crate::session::{FocusSession, SessionOutcome};

fn completed_starts(sessions: &[FocusSession]) -> Vec<DateTime<Utc>> {
    sessions
        .iter()
        .filter(|s| s.outcome == SessionOutcome::Completed)
        .map(|s| s.start_time)
        .collect()
}

fn within_a_day(later: DateTime<Utc>, earlier: DateTime<Utc>) -> bool {
    (later - earlier).num_days() <= 1
}

/// Current streak, walking back from `now` through completed sessions.
pub fn current_streak(sessions: &[FocusSession], now: DateTime<Utc>) -> u32 {
    let mut starts = completed_starts(sessions);
    starts.sort_unstable_by(|a, b| b.cmp(a));

    let mut cursor = now;
    let mut streak = 0;
    for start in starts {
        if !within_a_day(cursor, start) {
            break;
        }
        streak += 1;
        cursor = start;
    }
    streak
}

/// Longest streak anywhere in the history.
pub fn longest_streak(sessions: &[FocusSession]) -> u32 {
    let mut starts = completed_starts(sessions);
    starts.sort_unstable();

    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<DateTime<Utc>> = None;
    for start in starts {
        run = match previous {
            Some(prev) if within_a_day(start, prev) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(start);
    }
    longest
}
