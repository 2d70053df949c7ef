//! Core error types for monofocus-core.
//!
//! Errors are grouped by the layer that raises them and folded into
//! [`CoreError`] for callers that only want one type to propagate.

use std::path::PathBuf;
use thiserror::Error;

use crate::task::TaskStatus;
use crate::timer::TimerState;

/// Core error type for monofocus-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session timer misuse
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Task status transition rejected
    #[error("Task error: {0}")]
    Task(#[from] TaskTransitionError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the session timer state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A command was issued from a state that does not accept it.
    #[error("cannot {action} a timer that is {from:?}")]
    InvalidTransition { from: TimerState, action: &'static str },
}

/// A task status change that the task lifecycle does not allow.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid status transition: {from:?} → {to:?}")]
pub struct TaskTransitionError {
    pub from: TaskStatus,
    pub to: TaskStatus,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/config directory could not be prepared
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric value outside its allowed range
    #[error("Value {value} for '{field}' is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
