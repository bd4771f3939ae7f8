//! Error types for configuration and construction
//!
//! Runtime event handlers never fail; only building a tracker or loading
//! settings can.

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Typing effect needs at least one phrase to cycle through
    #[error("phrase list must not be empty")]
    EmptyPhrases,

    /// Reveal threshold outside [0, 1]
    #[error("visibility threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f32),

    /// Tilt divisor must be finite and positive
    #[error("tilt sensitivity must be finite and positive, got {0}")]
    InvalidSensitivity(f32),

    /// CSS perspective distance must be finite and positive
    #[error("tilt perspective must be finite and positive, got {0}")]
    InvalidPerspective(f32),

    /// A timer interval that cannot drive the state machine
    #[error("{name} must be greater than zero, got {value}")]
    InvalidInterval { name: &'static str, value: u32 },

    /// Device profile parameters out of range
    #[error("invalid device profile: {0}")]
    InvalidProfile(String),

    /// A required browser API is missing
    #[error("unsupported environment: {0}")]
    Unsupported(String),

    /// Settings JSON failed to parse
    #[error("settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
