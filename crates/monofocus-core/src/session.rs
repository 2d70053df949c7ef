//! Focus session records.
//!
//! A [`FocusSession`] is created by the session timer when it starts and is
//! handed back, finished, when the timer terminates. History snapshots fed
//! to the analytics in [`crate::stats`] are plain slices of these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::task::Task;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionOutcome {
    Completed,
    Partial,
    Abandoned,
    /// Still running; never the outcome of a finished session.
    InProgress,
}

impl SessionOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionOutcome::InProgress)
    }
}

/// One timed, single-task focus interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: String,
    pub user_id: String,
    /// Task the session was run against (not owned)
    pub task_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Planned length, fixed when the session is created
    pub intended_duration_minutes: u32,
    /// Derived at termination
    #[serde(default)]
    pub actual_duration_minutes: Option<u32>,
    #[serde(default)]
    pub interruptions_count: u32,
    pub outcome: SessionOutcome,
    /// Subjective difficulty, 1-10
    #[serde(default)]
    pub difficulty: Option<u8>,
    /// Productivity score, 0-100
    #[serde(default)]
    pub productivity_score: Option<f64>,
}

impl FocusSession {
    /// Open an in-progress session for `task`.
    pub fn begin(task: &Task, intended_duration_minutes: u32, start_time: DateTime<Utc>) -> Self {
        Self::open(&task.owner_id, &task.id, intended_duration_minutes, start_time)
    }

    pub(crate) fn open(
        user_id: &str,
        task_id: &str,
        intended_duration_minutes: u32,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("session-{}", uuid::Uuid::new_v4()),
            user_id: user_id.to_string(),
            task_id: task_id.to_string(),
            start_time,
            end_time: None,
            intended_duration_minutes,
            actual_duration_minutes: None,
            interruptions_count: 0,
            outcome: SessionOutcome::InProgress,
            difficulty: None,
            productivity_score: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Attach a difficulty rating (1-10).
    pub fn with_difficulty(mut self, difficulty: u8) -> Result<Self, ValidationError> {
        if !(1..=10).contains(&difficulty) {
            return Err(ValidationError::OutOfRange {
                field: "difficulty",
                value: i64::from(difficulty),
                min: 1,
                max: 10,
            });
        }
        self.difficulty = Some(difficulty);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_copies_task_identity() {
        let task = Task::new("user-7", "Draft");
        let now = Utc::now();
        let session = FocusSession::begin(&task, 25, now);
        assert_eq!(session.user_id, "user-7");
        assert_eq!(session.task_id, task.id);
        assert_eq!(session.start_time, now);
        assert_eq!(session.outcome, SessionOutcome::InProgress);
        assert!(!session.is_finished());
    }

    #[test]
    fn difficulty_must_be_one_to_ten() {
        let task = Task::new("u", "t");
        let session = FocusSession::begin(&task, 25, Utc::now());
        assert!(session.clone().with_difficulty(0).is_err());
        assert!(session.clone().with_difficulty(11).is_err());
        assert_eq!(session.with_difficulty(7).unwrap().difficulty, Some(7));
    }

    #[test]
    fn outcome_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&SessionOutcome::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::from_str::<SessionOutcome>("\"abandoned\"").unwrap(),
            SessionOutcome::Abandoned
        );
    }
}
