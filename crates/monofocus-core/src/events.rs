use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{FocusSession, SessionOutcome};
use crate::task::TaskStatus;
use crate::timer::TimerState;

/// Every session state change produces an Event.
/// Hosts render them; the runtime turns them into task status requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: String,
        task_id: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        session_id: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        session_id: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The intended duration was replaced; the countdown restarted from it.
    DurationChanged {
        session_id: Option<String>,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    InterruptionRecorded {
        session_id: String,
        interruptions_count: u32,
        at: DateTime<Utc>,
    },
    /// Terminal event carrying the finished session.
    SessionFinished {
        session: FocusSession,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        session_id: Option<String>,
        task_id: String,
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
        interruptions_count: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Task status this event asks the task collaborator to apply, if any.
    pub fn requested_task_status(&self) -> Option<TaskStatus> {
        match self {
            Event::SessionStarted { .. } | Event::SessionResumed { .. } => {
                Some(TaskStatus::InProgress)
            }
            Event::SessionPaused { .. } => Some(TaskStatus::Paused),
            Event::SessionFinished { session, .. } => match session.outcome {
                SessionOutcome::Completed => Some(TaskStatus::Completed),
                SessionOutcome::Partial | SessionOutcome::Abandoned => Some(TaskStatus::Deferred),
                SessionOutcome::InProgress => None,
            },
            _ => None,
        }
    }
}
