//! Cuecraft Error Definitions
//!
//! Defines error types used throughout the project.

use thiserror::Error;

use super::captions::TimestampFormatError;
use super::TimeMs;

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Caption Errors
    // =========================================================================
    #[error("Timestamp format error: {0}")]
    TimestampFormat(#[from] TimestampFormatError),

    #[error("Timestamp format error on line {line}: {source}")]
    TimestampFormatAt {
        line: usize,
        #[source]
        source: TimestampFormatError,
    },

    #[error(
        "Split invariant violated for cue {start_ms}~{end_ms}ms: expected {expected_segments} segments, produced {produced_segments}, last segment ends at {last_end_ms}ms"
    )]
    SplitInvariantViolation {
        start_ms: TimeMs,
        end_ms: TimeMs,
        expected_segments: usize,
        produced_segments: usize,
        last_end_ms: TimeMs,
    },

    // =========================================================================
    // Settings Errors
    // =========================================================================
    #[error("Settings error: {0}")]
    SettingsError(String),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Returns true for errors that indicate a logic defect rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::SplitInvariantViolation { .. })
    }
}
