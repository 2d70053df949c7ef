//! Productivity score for a single finished session.
//!
//! ```text
//! score = (completion * 0.4 + focus * 0.3 + duration * 0.3) * 100
//! ```
//!
//! | Term | Value |
//! |------|-------|
//! | completion | 1.0 completed, 0.7 partial, 0.3 otherwise |
//! | focus | `max(0, 1 - interruptions / 10)` |
//! | duration | `min(1, actual / intended)`, or 0.5 when either is unknown |

use serde::{Deserialize, Serialize};

use crate::session::{FocusSession, SessionOutcome};

pub const COMPLETION_WEIGHT: f64 = 0.4;
pub const FOCUS_WEIGHT: f64 = 0.3;
pub const DURATION_WEIGHT: f64 = 0.3;

/// Interruptions at which the focus term bottoms out.
const INTERRUPTION_CEILING: f64 = 10.0;

/// One weighted term of the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTerm {
    /// Raw score (0.0 to 1.0)
    pub score: f64,
    pub weight: f64,
    /// `score * weight * 100`
    pub points: f64,
}

impl ScoreTerm {
    fn new(score: f64, weight: f64) -> Self {
        Self {
            score,
            weight,
            points: score * weight * 100.0,
        }
    }
}

/// Score with each term broken out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub completion: ScoreTerm,
    pub focus: ScoreTerm,
    pub duration: ScoreTerm,
    /// Total, 0-100
    pub total: f64,
}

pub fn completion_score(outcome: SessionOutcome) -> f64 {
    match outcome {
        SessionOutcome::Completed => 1.0,
        SessionOutcome::Partial => 0.7,
        SessionOutcome::Abandoned | SessionOutcome::InProgress => 0.3,
    }
}

pub fn focus_score(interruptions: u32) -> f64 {
    (1.0 - f64::from(interruptions) / INTERRUPTION_CEILING).max(0.0)
}

pub fn duration_score(session: &FocusSession) -> f64 {
    match session.actual_duration_minutes {
        Some(actual) if session.intended_duration_minutes > 0 => {
            (f64::from(actual) / f64::from(session.intended_duration_minutes)).min(1.0)
        }
        _ => 0.5,
    }
}

pub fn score_breakdown(session: &FocusSession) -> ScoreBreakdown {
    let completion = ScoreTerm::new(completion_score(session.outcome), COMPLETION_WEIGHT);
    let focus = ScoreTerm::new(focus_score(session.interruptions_count), FOCUS_WEIGHT);
    let duration = ScoreTerm::new(duration_score(session), DURATION_WEIGHT);
    let total = (completion.points + focus.points + duration.points).clamp(0.0, 100.0);
    ScoreBreakdown {
        completion,
        focus,
        duration,
        total,
    }
}

/// Productivity score, 0-100.
pub fn score(session: &FocusSession) -> f64 {
    score_breakdown(session).total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use chrono::Utc;
    use proptest::prelude::*;

    fn session(
        outcome: SessionOutcome,
        interruptions: u32,
        intended: u32,
        actual: Option<u32>,
    ) -> FocusSession {
        let mut s = FocusSession::begin(&Task::new("u", "t"), intended, Utc::now());
        s.outcome = outcome;
        s.interruptions_count = interruptions;
        s.actual_duration_minutes = actual;
        s
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn perfect_session_scores_100() {
        let s = session(SessionOutcome::Completed, 0, 25, Some(25));
        assert!(approx(score(&s), 100.0));
    }

    #[test]
    fn one_interruption_costs_three_points() {
        let s = session(SessionOutcome::Completed, 1, 25, Some(25));
        assert!(approx(score(&s), 97.0));
    }

    #[test]
    fn outcome_weights() {
        assert_eq!(completion_score(SessionOutcome::Completed), 1.0);
        assert_eq!(completion_score(SessionOutcome::Partial), 0.7);
        assert_eq!(completion_score(SessionOutcome::Abandoned), 0.3);
        assert_eq!(completion_score(SessionOutcome::InProgress), 0.3);
    }

    #[test]
    fn focus_bottoms_out_at_ten_interruptions() {
        assert_eq!(focus_score(10), 0.0);
        assert_eq!(focus_score(25), 0.0);
        assert!(approx(focus_score(4), 0.6));
    }

    #[test]
    fn unknown_duration_scores_half() {
        let s = session(SessionOutcome::Partial, 0, 25, None);
        assert_eq!(duration_score(&s), 0.5);
        let s = session(SessionOutcome::Partial, 0, 0, Some(10));
        assert_eq!(duration_score(&s), 0.5);
        // 0.7*0.4 + 1*0.3 + 0.5*0.3
        assert!(approx(score(&session(SessionOutcome::Partial, 0, 25, None)), 73.0));
    }

    #[test]
    fn duration_is_capped_at_one() {
        let s = session(SessionOutcome::Completed, 0, 20, Some(40));
        assert_eq!(duration_score(&s), 1.0);
    }

    #[test]
    fn breakdown_sums_to_total() {
        let s = session(SessionOutcome::Partial, 3, 30, Some(15));
        let b = score_breakdown(&s);
        assert!(approx(b.completion.points, 28.0));
        assert!(approx(b.focus.points, 21.0));
        assert!(approx(b.duration.points, 15.0));
        assert!(approx(b.total, 64.0));
    }

    fn arb_outcome() -> impl Strategy<Value = SessionOutcome> {
        prop_oneof![
            Just(SessionOutcome::Completed),
            Just(SessionOutcome::Partial),
            Just(SessionOutcome::Abandoned),
            Just(SessionOutcome::InProgress),
        ]
    }

    proptest! {
        #[test]
        fn score_is_bounded(
            outcome in arb_outcome(),
            interruptions in 0u32..1000,
            intended in 0u32..600,
            actual in prop::option::of(0u32..1200),
        ) {
            let s = score(&session(outcome, interruptions, intended, actual));
            prop_assert!((0.0..=100.0).contains(&s));
        }

        #[test]
        fn more_interruptions_never_raise_score(
            outcome in arb_outcome(),
            interruptions in 0u32..50,
            extra in 1u32..20,
            intended in 1u32..180,
            actual in prop::option::of(0u32..180),
        ) {
            let fewer = score(&session(outcome, interruptions, intended, actual));
            let more = score(&session(outcome, interruptions + extra, intended, actual));
            prop_assert!(more <= fewer);
        }
    }
}
