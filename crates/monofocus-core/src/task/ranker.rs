//! Selection of the next task to focus on.
//!
//! Only `Pending` tasks are eligible. The highest `priority_score` wins; on a
//! tie the task that comes first in the input wins.

use super::{Task, TaskStatus};

/// Pick the pending task with the highest priority score.
///
/// Returns `None` when nothing is pending.
pub fn next_task(tasks: &[Task]) -> Option<&Task> {
    // `max_by_key` keeps the last maximum, so fold manually to keep the first.
    tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .fold(None, |best: Option<&Task>, task| match best {
            Some(b) if b.priority_score >= task.priority_score => Some(b),
            _ => Some(task),
        })
}

/// All pending tasks in selection order.
///
/// `rank(tasks).first()` is always the same task as `next_task(tasks)`.
pub fn rank(tasks: &[Task]) -> Vec<&Task> {
    let mut queue: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .collect();
    // Stable sort preserves input order among equal scores.
    queue.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
    queue
}
