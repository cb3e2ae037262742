//! Error types for configuration, level layouts and the session flow.

use std::path::PathBuf;

/// Errors raised while loading or validating a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Config file is not valid JSON for the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config parsed but holds an unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised while loading or validating a level layout.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// Layout file could not be read.
    #[error("failed to read level layout {path}: {source}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Layout file is not valid JSON for the schema.
    #[error("failed to parse level layout: {0}")]
    Parse(#[from] serde_json::Error),

    /// Layout parsed but cannot be played.
    #[error("invalid level layout: {0}")]
    Invalid(String),
}

/// Errors raised by scene-flow transitions.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The requested transition is not allowed from the current phase.
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        /// Transition that was requested
        action: &'static str,
        /// Phase the session was in
        phase: String,
    },
}
