//! Cuecraft Core Type Definitions
//!
//! Defines fundamental types used throughout the project.

// =============================================================================
// Time Types
// =============================================================================

/// Time in milliseconds (unsigned integer)
pub type TimeMs = u64;

/// 1-based line number within a parsed input
pub type LineNumber = usize;

/// Number of milliseconds in one second
pub const MS_PER_SECOND: TimeMs = 1_000;

/// Number of milliseconds in one minute
pub const MS_PER_MINUTE: TimeMs = 60 * MS_PER_SECOND;

/// Number of milliseconds in one hour
pub const MS_PER_HOUR: TimeMs = 60 * MS_PER_MINUTE;
