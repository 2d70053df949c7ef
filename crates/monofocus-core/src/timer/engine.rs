//! Session timer implementation.
//!
//! The timer is a per-session state machine over a one-second countdown. It
//! does not use internal threads - the host calls `tick()` once per second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused <-> Running) -> (Completed | Partial | Abandoned)
//! ```
//!
//! Terminal states are final for the instance; a new session needs a new timer.
//!
//! ## Stale ticks
//!
//! Ticks are issued against a [`TickToken`] taken while the timer is
//! running. Every transition bumps the timer's generation, so a tick that was
//! scheduled before a pause or termination is dropped instead of counting
//! down a session that has already moved on.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = SessionTimer::new(&task, Some(25));
//! timer.start()?;
//! // once per second:
//! if let Some(token) = timer.tick_token() {
//!     timer.tick(token); // Some(Event::SessionFinished) when it reaches zero
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimerError;
use crate::events::Event;
use crate::session::{FocusSession, SessionOutcome};
use crate::task::Task;

/// Session length used when no positive duration is available.
pub const DEFAULT_SESSION_MINUTES: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
    Partial,
    Abandoned,
}

impl TimerState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TimerState::Completed | TimerState::Partial | TimerState::Abandoned
        )
    }

    fn from_outcome(outcome: SessionOutcome) -> Option<Self> {
        match outcome {
            SessionOutcome::Completed => Some(TimerState::Completed),
            SessionOutcome::Partial => Some(TimerState::Partial),
            SessionOutcome::Abandoned => Some(TimerState::Abandoned),
            SessionOutcome::InProgress => None,
        }
    }
}

/// Permission to apply one tick, valid for a single running period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickToken {
    generation: u64,
}

/// Countdown state machine for one focus session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTimer {
    state: TimerState,
    task_id: String,
    user_id: String,
    intended_duration_minutes: u32,
    /// Seconds left in the countdown.
    time_remaining_secs: u64,
    /// Bumped on every transition; invalidates outstanding tick tokens.
    #[serde(default)]
    generation: u64,
    /// The in-flight (or finished) session, created on start.
    #[serde(default)]
    session: Option<FocusSession>,
}

impl SessionTimer {
    /// Create an idle timer bound to `task`.
    ///
    /// The duration is the first positive value of `intended_minutes`, the
    /// task's own estimate, or [`DEFAULT_SESSION_MINUTES`].
    pub fn new(task: &Task, intended_minutes: Option<u32>) -> Self {
        Self::with_fallback(task, intended_minutes, DEFAULT_SESSION_MINUTES)
    }

    /// Like [`SessionTimer::new`] with a caller-chosen fallback duration.
    pub fn with_fallback(task: &Task, intended_minutes: Option<u32>, fallback_minutes: u32) -> Self {
        let minutes = intended_minutes
            .filter(|m| *m > 0)
            .or(task.estimated_minutes.filter(|m| *m > 0))
            .unwrap_or_else(|| {
                let fallback = positive_or_default(fallback_minutes);
                tracing::debug!(task_id = %task.id, fallback, "no session duration given, using fallback");
                fallback
            });
        Self {
            state: TimerState::Idle,
            task_id: task.id.clone(),
            user_id: task.owner_id.clone(),
            intended_duration_minutes: minutes,
            time_remaining_secs: u64::from(minutes) * 60,
            generation: 0,
            session: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn intended_duration_minutes(&self) -> u32 {
        self.intended_duration_minutes
    }

    pub fn time_remaining_secs(&self) -> u64 {
        self.time_remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        u64::from(self.intended_duration_minutes) * 60
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.total_secs().saturating_sub(self.time_remaining_secs)
    }

    /// 0.0 .. 1.0 progress through the countdown.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (self.elapsed_secs() as f64 / total as f64).clamp(0.0, 1.0)
    }

    pub fn interruptions_count(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.interruptions_count)
    }

    pub fn session(&self) -> Option<&FocusSession> {
        self.session.as_ref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.id.as_str())
    }

    /// The finished session, once the timer reached a terminal state.
    pub fn finished_session(&self) -> Option<&FocusSession> {
        self.session.as_ref().filter(|s| s.is_finished())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Token for the next tick; `None` unless running.
    pub fn tick_token(&self) -> Option<TickToken> {
        (self.state == TimerState::Running).then_some(TickToken {
            generation: self.generation,
        })
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            session_id: self.session_id().map(str::to_string),
            task_id: self.task_id.clone(),
            remaining_secs: self.time_remaining_secs,
            total_secs: self.total_secs(),
            progress: self.progress(),
            interruptions_count: self.interruptions_count(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Result<Event, TimerError> {
        self.start_at(Utc::now())
    }

    /// Idle -> Running, opening the session at `now`.
    pub fn start_at(&mut self, now: DateTime<Utc>) -> Result<Event, TimerError> {
        if self.state != TimerState::Idle {
            return Err(self.invalid("start"));
        }
        let session = FocusSession::open(
            &self.user_id,
            &self.task_id,
            self.intended_duration_minutes,
            now,
        );
        let event = Event::SessionStarted {
            session_id: session.id.clone(),
            task_id: self.task_id.clone(),
            duration_secs: self.total_secs(),
            at: now,
        };
        tracing::info!(
            session_id = %session.id,
            task_id = %self.task_id,
            minutes = self.intended_duration_minutes,
            "focus session started"
        );
        self.session = Some(session);
        self.time_remaining_secs = self.total_secs();
        self.enter(TimerState::Running);
        Ok(event)
    }

    pub fn pause(&mut self) -> Result<Event, TimerError> {
        if self.state != TimerState::Running {
            return Err(self.invalid("pause"));
        }
        self.enter(TimerState::Paused);
        tracing::debug!(remaining_secs = self.time_remaining_secs, "session paused");
        Ok(Event::SessionPaused {
            session_id: self.session_id().unwrap_or_default().to_string(),
            remaining_secs: self.time_remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Result<Event, TimerError> {
        if self.state != TimerState::Paused {
            return Err(self.invalid("resume"));
        }
        self.enter(TimerState::Running);
        tracing::debug!(remaining_secs = self.time_remaining_secs, "session resumed");
        Ok(Event::SessionResumed {
            session_id: self.session_id().unwrap_or_default().to_string(),
            remaining_secs: self.time_remaining_secs,
            at: Utc::now(),
        })
    }

    /// Replace the intended duration.
    ///
    /// The countdown restarts from the new total: elapsed time is discarded,
    /// not prorated. A zero duration falls back to [`DEFAULT_SESSION_MINUTES`].
    pub fn set_intended_duration(&mut self, minutes: u32) -> Result<Event, TimerError> {
        if self.state.is_terminal() {
            return Err(self.invalid("change the duration of"));
        }
        let minutes = positive_or_default(minutes);
        self.intended_duration_minutes = minutes;
        self.time_remaining_secs = self.total_secs();
        if let Some(session) = self.session.as_mut() {
            session.intended_duration_minutes = minutes;
        }
        // Ticks scheduled against the old countdown must not land on the new one.
        self.generation += 1;
        tracing::debug!(minutes, "session duration changed, countdown restarted");
        Ok(Event::DurationChanged {
            session_id: self.session_id().map(str::to_string),
            duration_secs: self.total_secs(),
            at: Utc::now(),
        })
    }

    /// Apply one second of countdown.
    ///
    /// Returns `Some(Event::SessionFinished)` when the countdown reaches zero.
    /// Stale tokens and non-running timers are ignored.
    pub fn tick(&mut self, token: TickToken) -> Option<Event> {
        if self.state != TimerState::Running || token.generation != self.generation {
            tracing::trace!(
                state = ?self.state,
                token = token.generation,
                current = self.generation,
                "dropping stale tick"
            );
            return None;
        }
        self.time_remaining_secs = self.time_remaining_secs.saturating_sub(1);
        if self.time_remaining_secs == 0 {
            return Some(self.finish(SessionOutcome::Completed, Utc::now()));
        }
        None
    }

    pub fn terminate(&mut self, outcome: SessionOutcome) -> Result<Event, TimerError> {
        self.terminate_at(outcome, Utc::now())
    }

    /// Running | Paused -> terminal state matching `outcome`.
    pub fn terminate_at(
        &mut self,
        outcome: SessionOutcome,
        now: DateTime<Utc>,
    ) -> Result<Event, TimerError> {
        if !matches!(self.state, TimerState::Running | TimerState::Paused)
            || !outcome.is_terminal()
        {
            return Err(self.invalid("terminate"));
        }
        Ok(self.finish(outcome, now))
    }

    /// Count one interruption against the running session.
    pub(crate) fn note_interruption(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let session = self.session.as_mut()?;
        session.interruptions_count += 1;
        tracing::debug!(
            session_id = %session.id,
            count = session.interruptions_count,
            "interruption recorded"
        );
        Some(Event::InterruptionRecorded {
            session_id: session.id.clone(),
            interruptions_count: session.interruptions_count,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, state: TimerState) {
        self.state = state;
        self.generation += 1;
    }

    fn finish(&mut self, outcome: SessionOutcome, now: DateTime<Utc>) -> Event {
        let remaining_min = self.time_remaining_secs.div_ceil(60);
        let actual = u64::from(self.intended_duration_minutes).saturating_sub(remaining_min) as u32;
        if let Some(state) = TimerState::from_outcome(outcome) {
            self.enter(state);
        }

        let Some(session) = self.session.as_mut() else {
            return self.snapshot();
        };
        session.end_time = Some(now);
        session.actual_duration_minutes = Some(actual);
        session.outcome = outcome;
        tracing::info!(
            session_id = %session.id,
            outcome = ?outcome,
            actual_minutes = actual,
            interruptions = session.interruptions_count,
            "focus session finished"
        );
        Event::SessionFinished {
            session: session.clone(),
            at: now,
        }
    }

    fn invalid(&self, action: &'static str) -> TimerError {
        TimerError::InvalidTransition {
            from: self.state,
            action,
        }
    }
}

fn positive_or_default(minutes: u32) -> u32 {
    if minutes == 0 {
        DEFAULT_SESSION_MINUTES
    } else {
        minutes
    }
}
