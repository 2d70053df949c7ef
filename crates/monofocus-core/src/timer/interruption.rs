//! Foreground/background interruption detection.
//!
//! A detector is bound to one session. Each time the host reports the app
//! coming back to the foreground after being backgrounded, the bound timer
//! gets one interruption, provided it is running at that moment.

use serde::{Deserialize, Serialize};

use super::engine::{SessionTimer, TimerState};
use crate::events::Event;

/// Visibility signal reported by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Foreground,
    Background,
}

#[derive(Debug, Clone)]
pub struct InterruptionDetector {
    session_id: String,
    last: Visibility,
}

impl InterruptionDetector {
    /// Bind a detector to the session `timer` is running.
    ///
    /// Returns `None` for a timer that has not been started.
    pub fn bind(timer: &SessionTimer) -> Option<Self> {
        timer.session_id().map(|id| Self {
            session_id: id.to_string(),
            last: Visibility::Foreground,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Feed a visibility change; returns the interruption event if one was counted.
    pub fn observe(&mut self, visibility: Visibility, timer: &mut SessionTimer) -> Option<Event> {
        let previous = std::mem::replace(&mut self.last, visibility);
        let returned = previous == Visibility::Background && visibility == Visibility::Foreground;
        if !returned {
            return None;
        }
        if timer.session_id() != Some(self.session_id.as_str()) {
            tracing::debug!(
                bound = %self.session_id,
                "ignoring visibility change for a different session"
            );
            return None;
        }
        if timer.state() != TimerState::Running {
            return None;
        }
        timer.note_interruption()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    fn running_timer() -> SessionTimer {
        let mut timer = SessionTimer::new(&Task::new("u", "t"), Some(25));
        timer.start().unwrap();
        timer
    }

    fn away_and_back(detector: &mut InterruptionDetector, timer: &mut SessionTimer) -> Option<Event> {
        detector.observe(Visibility::Background, timer);
        detector.observe(Visibility::Foreground, timer)
    }

    #[test]
    fn unstarted_timer_cannot_be_bound() {
        let timer = SessionTimer::new(&Task::new("u", "t"), Some(25));
        assert!(InterruptionDetector::bind(&timer).is_none());
    }

    #[test]
    fn return_to_foreground_counts_once() {
        let mut timer = running_timer();
        let mut detector = InterruptionDetector::bind(&timer).unwrap();

        let event = away_and_back(&mut detector, &mut timer);
        assert!(matches!(
            event,
            Some(Event::InterruptionRecorded { interruptions_count: 1, .. })
        ));
        away_and_back(&mut detector, &mut timer);
        assert_eq!(timer.interruptions_count(), 2);
    }

    #[test]
    fn repeated_signals_without_transition_do_not_count() {
        let mut timer = running_timer();
        let mut detector = InterruptionDetector::bind(&timer).unwrap();
        detector.observe(Visibility::Foreground, &mut timer);
        detector.observe(Visibility::Background, &mut timer);
        detector.observe(Visibility::Background, &mut timer);
        detector.observe(Visibility::Foreground, &mut timer);
        detector.observe(Visibility::Foreground, &mut timer);
        assert_eq!(timer.interruptions_count(), 1);
    }

    #[test]
    fn paused_timer_is_not_interrupted() {
        let mut timer = running_timer();
        let mut detector = InterruptionDetector::bind(&timer).unwrap();
        timer.pause().unwrap();
        assert!(away_and_back(&mut detector, &mut timer).is_none());
        assert_eq!(timer.interruptions_count(), 0);
    }

    #[test]
    fn terminated_timer_is_not_interrupted() {
        let mut timer = running_timer();
        let mut detector = InterruptionDetector::bind(&timer).unwrap();
        timer
            .terminate(crate::session::SessionOutcome::Completed)
            .unwrap();
        assert!(away_and_back(&mut detector, &mut timer).is_none());
        assert_eq!(timer.interruptions_count(), 0);
    }

    #[test]
    fn detector_does_not_carry_over_to_another_session() {
        let first = running_timer();
        let mut detector = InterruptionDetector::bind(&first).unwrap();
        let mut second = running_timer();
        assert!(away_and_back(&mut detector, &mut second).is_none());
        assert_eq!(second.interruptions_count(), 0);
    }
}
