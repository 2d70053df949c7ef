//! Summary statistics over a session history.
//!
//! Stats are rebuilt from the whole history on every call; nothing is
//! updated incrementally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scoring::score;
use super::streak::{current_streak, longest_streak};
use crate::config::AnalyticsConfig;
use crate::session::{FocusSession, SessionOutcome};

/// Session counts per outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub completed: u64,
    pub partial: u64,
    pub abandoned: u64,
    pub in_progress: u64,
}

impl OutcomeCounts {
    fn record(&mut self, outcome: SessionOutcome) {
        match outcome {
            SessionOutcome::Completed => self.completed += 1,
            SessionOutcome::Partial => self.partial += 1,
            SessionOutcome::Abandoned => self.abandoned += 1,
            SessionOutcome::InProgress => self.in_progress += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total_sessions: u64,
    /// Minutes
    pub total_focus_time: u64,
    /// Minutes per session
    pub average_session_length: f64,
    /// Percent of sessions completed
    pub completion_rate: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Mean productivity score, 0-100
    pub productivity_score: f64,
    pub total_interruptions: u64,
    pub outcome_counts: OutcomeCounts,
    /// Focus minutes per day, oldest first, last entry is today
    pub weekly_focus: Vec<u64>,
    pub monthly_focus: Vec<u64>,
}

impl ProgressStats {
    /// All-zero stats with zero-filled series.
    pub fn empty(weekly_days: usize, monthly_days: usize) -> Self {
        Self {
            weekly_focus: vec![0; weekly_days],
            monthly_focus: vec![0; monthly_days],
            ..Self::default()
        }
    }
}

/// Folds a session history into [`ProgressStats`].
#[derive(Debug, Clone)]
pub struct ProgressAggregator {
    weekly_days: usize,
    monthly_days: usize,
}

impl Default for ProgressAggregator {
    fn default() -> Self {
        Self::from_config(&AnalyticsConfig::default())
    }
}

impl ProgressAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self {
            weekly_days: config.weekly_window_days as usize,
            monthly_days: config.monthly_window_days as usize,
        }
    }

    pub fn aggregate(&self, sessions: &[FocusSession], now: DateTime<Utc>) -> ProgressStats {
        if sessions.is_empty() {
            return ProgressStats::empty(self.weekly_days, self.monthly_days);
        }

        let mut outcome_counts = OutcomeCounts::default();
        let mut total_focus_time = 0u64;
        let mut total_interruptions = 0u64;
        let mut score_sum = 0.0;
        for session in sessions {
            outcome_counts.record(session.outcome);
            total_focus_time += u64::from(session.actual_duration_minutes.unwrap_or(0));
            total_interruptions += u64::from(session.interruptions_count);
            score_sum += score(session);
        }

        let total = sessions.len() as f64;
        ProgressStats {
            total_sessions: sessions.len() as u64,
            total_focus_time,
            average_session_length: total_focus_time as f64 / total,
            completion_rate: outcome_counts.completed as f64 / total * 100.0,
            current_streak: current_streak(sessions, now),
            longest_streak: longest_streak(sessions),
            productivity_score: score_sum / total,
            total_interruptions,
            outcome_counts,
            weekly_focus: daily_focus(sessions, now, self.weekly_days),
            monthly_focus: daily_focus(sessions, now, self.monthly_days),
        }
    }
}

/// Aggregate with the default 7- and 30-day windows.
pub fn aggregate(sessions: &[FocusSession], now: DateTime<Utc>) -> ProgressStats {
    ProgressAggregator::default().aggregate(sessions, now)
}

/// Focus minutes bucketed by UTC calendar day over the `days` ending at `now`.
pub fn daily_focus(sessions: &[FocusSession], now: DateTime<Utc>, days: usize) -> Vec<u64> {
    let mut buckets = vec![0u64; days];
    let today = now.date_naive();
    for session in sessions {
        let Some(minutes) = session.actual_duration_minutes else {
            continue;
        };
        let offset = (today - session.start_time.date_naive()).num_days();
        if offset < 0 || offset as usize >= days {
            continue;
        }
        buckets[days - 1 - offset as usize] += u64::from(minutes);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 15, 0, 0).unwrap()
    }

    fn session(
        start: DateTime<Utc>,
        outcome: SessionOutcome,
        actual: Option<u32>,
        interruptions: u32,
    ) -> FocusSession {
        let mut s = FocusSession::begin(&Task::new("u", "t"), 25, start);
        s.outcome = outcome;
        s.actual_duration_minutes = actual;
        s.interruptions_count = interruptions;
        s
    }

    #[test]
    fn empty_history_is_all_zero() {
        let stats = aggregate(&[], now());
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.total_focus_time, 0);
        assert_eq!(stats.average_session_length, 0.0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.productivity_score, 0.0);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.weekly_focus, vec![0; 7]);
        assert_eq!(stats.monthly_focus, vec![0; 30]);
        assert!(!stats.average_session_length.is_nan());
    }

    #[test]
    fn totals_and_rates() {
        let history = vec![
            session(now() - Duration::hours(1), SessionOutcome::Completed, Some(25), 0),
            session(now() - Duration::hours(3), SessionOutcome::Partial, Some(15), 2),
            session(now() - Duration::hours(5), SessionOutcome::Abandoned, Some(5), 4),
            session(now() - Duration::hours(7), SessionOutcome::Completed, Some(25), 0),
        ];
        let stats = aggregate(&history, now());
        assert_eq!(stats.total_sessions, 4);
        assert_eq!(stats.total_focus_time, 70);
        assert_eq!(stats.average_session_length, 17.5);
        assert_eq!(stats.completion_rate, 50.0);
        assert_eq!(stats.total_interruptions, 6);
        assert_eq!(stats.outcome_counts.completed, 2);
        assert_eq!(stats.outcome_counts.partial, 1);
        assert_eq!(stats.outcome_counts.abandoned, 1);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);

        let expected = history.iter().map(score).sum::<f64>() / 4.0;
        assert!((stats.productivity_score - expected).abs() < 1e-9);
    }

    #[test]
    fn missing_actual_duration_counts_as_zero() {
        let history = vec![
            session(now(), SessionOutcome::InProgress, None, 0),
            session(now(), SessionOutcome::Completed, Some(30), 0),
        ];
        let stats = aggregate(&history, now());
        assert_eq!(stats.total_focus_time, 30);
        assert_eq!(stats.average_session_length, 15.0);
        assert_eq!(stats.outcome_counts.in_progress, 1);
    }

    #[test]
    fn series_buckets_by_calendar_day() {
        let history = vec![
            session(now(), SessionOutcome::Completed, Some(25), 0),
            session(now() - Duration::hours(2), SessionOutcome::Partial, Some(10), 0),
            session(now() - Duration::days(1), SessionOutcome::Completed, Some(30), 0),
            session(now() - Duration::days(6), SessionOutcome::Completed, Some(20), 0),
            session(now() - Duration::days(7), SessionOutcome::Completed, Some(45), 0),
            session(now() - Duration::days(40), SessionOutcome::Completed, Some(60), 0),
            session(now() + Duration::days(2), SessionOutcome::Completed, Some(5), 0),
        ];
        let stats = aggregate(&history, now());
        assert_eq!(stats.weekly_focus, vec![20, 0, 0, 0, 0, 30, 35]);
        assert_eq!(stats.monthly_focus.len(), 30);
        assert_eq!(stats.monthly_focus[29], 35);
        assert_eq!(stats.monthly_focus[22], 45);
        assert_eq!(stats.monthly_focus.iter().sum::<u64>(), 130);
    }

    #[test]
    fn custom_windows() {
        let config = AnalyticsConfig {
            weekly_window_days: 3,
            monthly_window_days: 14,
        };
        let aggregator = ProgressAggregator::from_config(&config);
        let stats = aggregator.aggregate(&[], now());
        assert_eq!(stats.weekly_focus.len(), 3);
        assert_eq!(stats.monthly_focus.len(), 14);
    }

    #[test]
    fn recomputation_is_stable() {
        let history = vec![
            session(now() - Duration::hours(1), SessionOutcome::Completed, Some(25), 1),
            session(now() - Duration::days(1), SessionOutcome::Partial, Some(12), 3),
        ];
        assert_eq!(aggregate(&history, now()), aggregate(&history, now()));
    }
}
