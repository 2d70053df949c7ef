mod engine;
mod interruption;
mod runtime;
pub mod driver;

pub use engine::{SessionTimer, TickToken, TimerState, DEFAULT_SESSION_MINUTES};
pub use interruption::{InterruptionDetector, Visibility};
pub use runtime::FocusRuntime;
