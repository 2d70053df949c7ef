//! A running focus session wired to its collaborators.
//!
//! [`FocusRuntime`] owns one [`SessionTimer`], the [`InterruptionDetector`]
//! bound to it, and the [`TaskStatusSink`] supplied by the caller. Every
//! command is forwarded to the timer; the resulting event is turned into a
//! task status request for the sink. A failing sink is logged and otherwise
//! ignored: the timer's state has already moved and stays that way.

use crate::error::TimerError;
use crate::events::Event;
use crate::session::{FocusSession, SessionOutcome};
use crate::stats::score;
use crate::task::TaskStatusSink;

use super::engine::{SessionTimer, TickToken};
use super::interruption::{InterruptionDetector, Visibility};

pub struct FocusRuntime<S> {
    timer: SessionTimer,
    detector: Option<InterruptionDetector>,
    sink: S,
    finished: Option<FocusSession>,
}

impl<S: TaskStatusSink> FocusRuntime<S> {
    pub fn new(timer: SessionTimer, sink: S) -> Self {
        let detector = InterruptionDetector::bind(&timer);
        Self {
            timer,
            detector,
            sink,
            finished: None,
        }
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The finished, scored session once the timer has terminated.
    pub fn finished_session(&self) -> Option<&FocusSession> {
        self.finished.as_ref()
    }

    pub fn into_parts(self) -> (SessionTimer, S) {
        (self.timer, self.sink)
    }

    pub fn start(&mut self) -> Result<Event, TimerError> {
        let event = self.timer.start()?;
        // A fresh detector per session; nothing carries over from a previous one.
        self.detector = InterruptionDetector::bind(&self.timer);
        Ok(self.dispatch(event))
    }

    pub fn pause(&mut self) -> Result<Event, TimerError> {
        let event = self.timer.pause()?;
        Ok(self.dispatch(event))
    }

    pub fn resume(&mut self) -> Result<Event, TimerError> {
        let event = self.timer.resume()?;
        Ok(self.dispatch(event))
    }

    pub fn terminate(&mut self, outcome: SessionOutcome) -> Result<Event, TimerError> {
        let event = self.timer.terminate(outcome)?;
        Ok(self.dispatch(event))
    }

    pub fn set_intended_duration(&mut self, minutes: u32) -> Result<Event, TimerError> {
        let event = self.timer.set_intended_duration(minutes)?;
        Ok(self.dispatch(event))
    }

    pub fn tick_token(&self) -> Option<TickToken> {
        self.timer.tick_token()
    }

    pub fn tick(&mut self, token: TickToken) -> Option<Event> {
        let event = self.timer.tick(token)?;
        Some(self.dispatch(event))
    }

    /// Host foreground/background signal.
    pub fn visibility_changed(&mut self, visibility: Visibility) -> Option<Event> {
        let detector = self.detector.as_mut()?;
        let event = detector.observe(visibility, &mut self.timer)?;
        Some(self.dispatch(event))
    }

    fn dispatch(&mut self, mut event: Event) -> Event {
        if let Event::SessionFinished { session, .. } = &mut event {
            session.productivity_score = Some(score(session));
            self.finished = Some(session.clone());
        }

        if let Some(status) = event.requested_task_status() {
            let task_id = self.timer.task_id().to_string();
            if let Err(e) = self.sink.set_status(&task_id, status) {
                tracing::warn!(task_id = %task_id, ?status, error = %e, "task status update failed");
            }
        }
        event
    }
}
