//! Cooperative once-per-second tick loop on tokio.
//!
//! The runtime is shared behind an async mutex so ticks, interruption signals
//! and user commands never touch the countdown at the same time. The tick
//! token is taken under the same lock that applies the tick, once the
//! interval has fired, so the countdown keeps its phase across pause/resume.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::engine::TimerState;
use super::runtime::FocusRuntime;
use crate::events::Event;
use crate::session::FocusSession;
use crate::task::TaskStatusSink;

pub type SharedRuntime<S> = Arc<Mutex<FocusRuntime<S>>>;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Wrap a runtime for sharing between the tick loop and its host.
pub fn share<S>(runtime: FocusRuntime<S>) -> SharedRuntime<S> {
    Arc::new(Mutex::new(runtime))
}

/// Spawn the tick loop.
///
/// The runtime must already be started; a loop spawned on an idle runtime
/// returns `None` on its first interval. Each applied tick sends an event on
/// `events` (a snapshot, or the `SessionFinished` event on the last one). The
/// task ends when the timer reaches a terminal state and yields the finished
/// session.
pub fn spawn_ticker<S>(
    runtime: SharedRuntime<S>,
    period: Duration,
    events: Option<mpsc::UnboundedSender<Event>>,
) -> JoinHandle<Option<FocusSession>>
where
    S: TaskStatusSink + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;

            let mut rt = runtime.lock().await;
            match rt.timer().state() {
                state if state.is_terminal() => return rt.finished_session().cloned(),
                TimerState::Idle => {
                    tracing::warn!("tick loop spawned before the session started, stopping");
                    return None;
                }
                _ => {}
            }
            let Some(token) = rt.tick_token() else {
                continue;
            };
            let event = match rt.tick(token) {
                Some(event) => event,
                None => rt.timer().snapshot(),
            };
            if let Some(tx) = &events {
                // Receiver gone just means nobody is watching.
                let _ = tx.send(event);
            }
            if rt.timer().state().is_terminal() {
                return rt.finished_session().cloned();
            }
        }
    })
}
