//! Task model for single-active-task focus work.
//!
//! A task moves through a small status lifecycle driven by the focus
//! sessions run against it:
//!
//! ```text
//!   PENDING ──start──> IN-PROGRESS ──complete──> COMPLETED
//!     ^  |                |    ^
//!     |  |           pause|    |resume
//!     |  |                v    |
//!     |  |              PAUSED ─┘
//!     |  |                |
//!     |  +────defer───> DEFERRED <──(partial / abandoned)
//!     +───── reopen ──────+
//! ```
//!
//! Status changes are requested through [`TaskStatusSink`], which the
//! session runtime receives explicitly instead of reaching into a shared store.

pub mod ranker;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, TaskTransitionError, ValidationError};

pub use ranker::{next_task, rank};

/// Estimated length used when a task carries no estimate of its own.
pub const DEFAULT_TASK_ESTIMATE_MINUTES: u32 = 30;

/// Highest value a `priority_score` may hold.
pub const MAX_PRIORITY_SCORE: u8 = 100;

/// Task status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Waiting to be picked (initial state)
    #[default]
    Pending,
    /// A focus session is running on it
    InProgress,
    /// Its session was paused
    Paused,
    /// Done (terminal)
    Completed,
    /// Pushed back after a partial or abandoned session
    Deferred,
}

impl TaskStatus {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &TaskStatus) -> bool {
        self.valid_transitions().contains(to)
    }

    /// Get valid next states for this state.
    pub fn valid_transitions(&self) -> &'static [TaskStatus] {
        match self {
            TaskStatus::Pending => &[TaskStatus::InProgress, TaskStatus::Deferred],
            TaskStatus::InProgress => &[
                TaskStatus::InProgress,
                TaskStatus::Paused,
                TaskStatus::Completed,
                TaskStatus::Deferred,
            ],
            TaskStatus::Paused => &[
                TaskStatus::InProgress,
                TaskStatus::Completed,
                TaskStatus::Deferred,
            ],
            TaskStatus::Deferred => &[TaskStatus::Pending, TaskStatus::InProgress],
            TaskStatus::Completed => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

/// A unit of work that focus sessions are run against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Owner of the task
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Urgency, 0-100 (higher = more urgent)
    #[serde(default, deserialize_with = "clamped_priority")]
    pub priority_score: u8,
    /// Estimated duration in minutes (null when unknown)
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// User override weight
    #[serde(default)]
    pub manual_priority: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Reads any non-negative score, clamping it to [`MAX_PRIORITY_SCORE`].
fn clamped_priority<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = u64::deserialize(deserializer)?;
    Ok(raw.min(u64::from(MAX_PRIORITY_SCORE)) as u8)
}

impl Task {
    /// Create a pending task with default values.
    pub fn new(owner_id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Task {
            id: format!("task-{}", uuid::Uuid::new_v4()),
            owner_id: owner_id.into(),
            title: title.into(),
            description: None,
            priority_score: 0,
            estimated_minutes: None,
            status: TaskStatus::Pending,
            tags: BTreeSet::new(),
            due_date: None,
            manual_priority: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Set the priority score, clamped to 0-100.
    pub fn with_priority(mut self, score: u8) -> Self {
        self.priority_score = score.min(MAX_PRIORITY_SCORE);
        self
    }

    pub fn with_estimate(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Estimated minutes, falling back to [`DEFAULT_TASK_ESTIMATE_MINUTES`].
    pub fn estimate_or_default(&self) -> u32 {
        self.estimate_or(DEFAULT_TASK_ESTIMATE_MINUTES)
    }

    pub fn estimate_or(&self, fallback: u32) -> u32 {
        self.estimated_minutes.filter(|m| *m > 0).unwrap_or(fallback)
    }

    /// Transition to a new status, refreshing timestamps.
    pub fn transition_to(&mut self, status: TaskStatus) -> Result<(), TaskTransitionError> {
        if !self.status.can_transition_to(&status) {
            return Err(TaskTransitionError {
                from: self.status,
                to: status,
            });
        }

        let now = Utc::now();
        if status == TaskStatus::Completed {
            self.completed_at = Some(now);
        }
        self.status = status;
        self.updated_at = now;
        Ok(())
    }
}

/// Receiver of the task status changes a focus session requests.
///
/// Implemented by whatever owns the task collection. Closures of the shape
/// `FnMut(&str, TaskStatus) -> Result<(), CoreError>` implement it too.
pub trait TaskStatusSink {
    fn set_status(&mut self, task_id: &str, status: TaskStatus) -> Result<(), CoreError>;
}

impl<F> TaskStatusSink for F
where
    F: FnMut(&str, TaskStatus) -> Result<(), CoreError>,
{
    fn set_status(&mut self, task_id: &str, status: TaskStatus) -> Result<(), CoreError> {
        self(task_id, status)
    }
}

/// In-memory task collection supplied by a caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// The pending task a new session should be bound to.
    pub fn next_task(&self) -> Option<&Task> {
        next_task(&self.tasks)
    }
}

impl TaskStatusSink for TaskBoard {
    fn set_status(&mut self, task_id: &str, status: TaskStatus) -> Result<(), CoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "task_id".into(),
                message: format!("no task with id '{task_id}'"),
            })?;
        task.transition_to(status)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_pending() {
        let task = Task::new("user-1", "Write report");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.id.starts_with("task-"));
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn estimate_defaults_to_thirty_minutes() {
        let task = Task::new("u", "t");
        assert_eq!(task.estimate_or_default(), 30);
        assert_eq!(task.with_estimate(0).estimate_or_default(), 30);
        assert_eq!(Task::new("u", "t").with_estimate(90).estimate_or_default(), 90);
    }

    #[test]
    fn priority_is_clamped() {
        let task = Task::new("u", "t").with_priority(250);
        assert_eq!(task.priority_score, 100);
    }

    #[test]
    fn session_lifecycle_transitions() {
        let mut task = Task::new("u", "t");
        task.transition_to(TaskStatus::InProgress).unwrap();
        task.transition_to(TaskStatus::Paused).unwrap();
        task.transition_to(TaskStatus::InProgress).unwrap();
        task.transition_to(TaskStatus::Completed).unwrap();
        assert!(task.completed_at.is_some());
        assert!(task.updated_at >= task.created_at);
    }

    #[test]
    fn completed_is_terminal() {
        let mut task = Task::new("u", "t");
        task.transition_to(TaskStatus::InProgress).unwrap();
        task.transition_to(TaskStatus::Completed).unwrap();
        let err = task.transition_to(TaskStatus::InProgress).unwrap_err();
        assert_eq!(err.from, TaskStatus::Completed);
        assert_eq!(err.to, TaskStatus::InProgress);
        assert!(TaskStatus::Completed.is_terminal());
    }

    #[test]
    fn pending_cannot_pause() {
        let mut task = Task::new("u", "t");
        assert!(task.transition_to(TaskStatus::Paused).is_err());
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn deferred_can_be_reopened() {
        let mut task = Task::new("u", "t");
        task.transition_to(TaskStatus::Deferred).unwrap();
        task.transition_to(TaskStatus::Pending).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn task_deserializes_with_missing_optional_fields() {
        let json = r#"{
            "id": "t1",
            "owner_id": "u1",
            "title": "Inbox zero",
            "priority_score": 40,
            "created_at": "2026-10-01T09:00:00Z",
            "updated_at": "2026-10-01T09:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.estimated_minutes, None);
        assert!(task.tags.is_empty());
    }

    #[test]
    fn deserialized_priority_is_clamped() {
        let json = r#"[
            {"id": "a", "owner_id": "u", "title": "A", "priority_score": 100,
             "created_at": "2026-10-01T09:00:00Z", "updated_at": "2026-10-01T09:00:00Z"},
            {"id": "b", "owner_id": "u", "title": "B", "priority_score": 250,
             "created_at": "2026-10-01T09:00:00Z", "updated_at": "2026-10-01T09:00:00Z"},
            {"id": "c", "owner_id": "u", "title": "C", "priority_score": 4000,
             "created_at": "2026-10-01T09:00:00Z", "updated_at": "2026-10-01T09:00:00Z"}
        ]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        assert!(tasks.iter().all(|t| t.priority_score == 100));
        // Equal after clamping, so input order decides.
        assert_eq!(next_task(&tasks).unwrap().id, "a");
    }

    #[test]
    fn negative_priority_is_rejected() {
        let json = r#"{"id": "a", "owner_id": "u", "title": "A", "priority_score": -5,
            "created_at": "2026-10-01T09:00:00Z", "updated_at": "2026-10-01T09:00:00Z"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn board_applies_status_requests() {
        let task = Task::new("u", "t");
        let id = task.id.clone();
        let mut board = TaskBoard::new(vec![task]);
        board.set_status(&id, TaskStatus::InProgress).unwrap();
        assert_eq!(board.get(&id).unwrap().status, TaskStatus::InProgress);
    }

    #[test]
    fn board_rejects_unknown_task() {
        let mut board = TaskBoard::default();
        let err = board.set_status("missing", TaskStatus::InProgress).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn closures_act_as_sinks() {
        let mut seen = Vec::new();
        let mut sink = |id: &str, status: TaskStatus| -> Result<(), CoreError> {
            seen.push((id.to_string(), status));
            Ok(())
        };
        sink.set_status("t1", TaskStatus::Paused).unwrap();
        assert_eq!(seen, vec![("t1".to_string(), TaskStatus::Paused)]);
    }
}
