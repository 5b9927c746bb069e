//! Error types for report analysis.
//!
//! Covers the classification failures (unsupported vIOS reports, malformed
//! custom-IOS markers), statistics that cannot be computed, and the I/O,
//! serialization and intake failures of the surrounding plumbing.

use thiserror::Error;

use crate::intake::IntakeRejection;

/// Errors that can occur while analyzing a sysCheck report.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The report was produced on a vWii; classification was aborted.
    #[error("vWii sysCheck reports are not supported")]
    UnsupportedInput,

    /// A line carried a recognized marker but not the sub-pattern that must
    /// accompany it (e.g. a d2x line without its version token).
    #[error("malformed marker for IOS{slot_id}: missing {pattern} in line {line:?}")]
    MalformedMarker {
        slot_id: u16,
        pattern: &'static str,
        line: String,
    },

    /// A percentage was requested over an empty population.
    #[error("cannot compute {statistic}: denominator is zero")]
    DivisionByZero { statistic: &'static str },

    /// File or stream I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration values are out of range.
    #[error("invalid config: {0}")]
    Config(String),

    /// The submitted file failed the intake policy.
    #[error("report rejected: {0}")]
    Rejected(#[from] IntakeRejection),
}

/// Convenience alias for results with [`AnalyzeError`].
pub type Result<T> = std::result::Result<T, AnalyzeError>;
