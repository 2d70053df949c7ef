//! # monofocus Core Library
//!
//! Business logic for working on one prioritized task at a time through
//! timed focus sessions. Storage-agnostic: every function works on task
//! lists and session histories the caller supplies.
//!
//! ## Architecture
//!
//! - **Ranker**: picks the next pending task by priority score
//! - **Session Timer**: a countdown state machine the host ticks once per second
//! - **Interruption Detector**: counts foreground returns while a session runs
//! - **Runtime / Driver**: wires timer, detector and the task collaborator,
//!   optionally on a tokio tick loop
//! - **Stats**: productivity score, streaks, progress summary
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: Core timer state machine
//! - [`FocusRuntime`]: Timer plus collaborators for one session
//! - [`next_task`]: Task selection
//! - [`aggregate`]: Progress statistics
//! - [`Config`]: Application configuration management

pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod task;
pub mod timer;

pub use config::{AnalyticsConfig, Config, SessionConfig};
pub use error::{ConfigError, CoreError, TaskTransitionError, TimerError, ValidationError};
pub use events::Event;
pub use session::{FocusSession, SessionOutcome};
pub use stats::{
    aggregate, current_streak, longest_streak, score, score_breakdown, ProgressAggregator,
    ProgressStats, ScoreBreakdown,
};
pub use task::{next_task, rank, Task, TaskBoard, TaskStatus, TaskStatusSink};
pub use timer::{
    FocusRuntime, InterruptionDetector, SessionTimer, TickToken, TimerState, Visibility,
};
