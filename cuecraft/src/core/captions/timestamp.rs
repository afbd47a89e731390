//! WebVTT Timestamp Codec
//!
//! Parses and formats millisecond timestamps in three textual forms:
//!
//! | Format                | Example        |
//! |-----------------------|----------------|
//! | `H:MM:SS.mmm`         | `01:10:01.100` |
//! | `MM:SS.mmm`           | `10:01.100`    |
//! | `SS.mmm`              | `01.100`       |
//!
//! A time range is classified once: the first format (in the order above)
//! found anywhere in the range text decides how both ends are read.

use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{TimeMs, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};

// =============================================================================
// Error Types
// =============================================================================

/// Errors produced while reading a timestamp or a timestamp range
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampFormatError {
    /// None of the known timestamp shapes occur in the text
    #[error("no timestamp found in {0:?}")]
    Unrecognized(String),

    /// The chosen shape occurs the wrong number of times
    #[error("expected {expected} timestamp(s) in {text:?}, found {found}")]
    WrongCount {
        text: String,
        expected: usize,
        found: usize,
    },

    /// A captured component is not a valid unsigned integer
    #[error("invalid number {value:?} in {text:?}")]
    InvalidNumber { text: String, value: String },

    /// The millisecond total does not fit in 64 bits
    #[error("timestamp out of range: {0:?}")]
    Overflow(String),
}

// =============================================================================
// Patterns
// =============================================================================

fn hours_regex() -> &'static Regex {
    static HOURS_REGEX: OnceLock<Regex> = OnceLock::new();
    HOURS_REGEX.get_or_init(|| {
        Regex::new(r"\s*([0-9]+):([0-9]+):([0-9]+)\.([0-9]+)\s*")
            .expect("Failed to compile H:MM:SS.mmm regex")
    })
}

fn minutes_regex() -> &'static Regex {
    static MINUTES_REGEX: OnceLock<Regex> = OnceLock::new();
    MINUTES_REGEX.get_or_init(|| {
        Regex::new(r"\s*([0-9]+):([0-9]+)\.([0-9]+)\s*").expect("Failed to compile MM:SS.mmm regex")
    })
}

fn seconds_regex() -> &'static Regex {
    static SECONDS_REGEX: OnceLock<Regex> = OnceLock::new();
    SECONDS_REGEX.get_or_init(|| {
        Regex::new(r"\s*([0-9]+)\.([0-9]+)\s*").expect("Failed to compile SS.mmm regex")
    })
}

// =============================================================================
// Timestamp Format
// =============================================================================

/// Textual shape of a timestamp, in classification priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `H:MM:SS.mmm`
    HoursMinutesSeconds,
    /// `MM:SS.mmm`
    MinutesSeconds,
    /// `SS.mmm`
    Seconds,
}

impl TimestampFormat {
    /// All formats, most specific first
    pub const PRIORITY: [TimestampFormat; 3] = [
        TimestampFormat::HoursMinutesSeconds,
        TimestampFormat::MinutesSeconds,
        TimestampFormat::Seconds,
    ];

    /// Returns the first format whose pattern occurs anywhere in `text`
    pub fn classify(text: &str) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|format| format.regex().is_match(text))
    }

    /// Number of numeric components captured by this format
    pub fn component_count(self) -> usize {
        match self {
            Self::HoursMinutesSeconds => 4,
            Self::MinutesSeconds => 3,
            Self::Seconds => 2,
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            Self::HoursMinutesSeconds => hours_regex(),
            Self::MinutesSeconds => minutes_regex(),
            Self::Seconds => seconds_regex(),
        }
    }

    /// Converts one match of this format to milliseconds.
    ///
    /// Components are read right to left (fraction, seconds, minutes, hours),
    /// so omitted higher units count as zero.
    fn to_millis(self, caps: &Captures<'_>, text: &str) -> Result<TimeMs, TimestampFormatError> {
        const UNITS: [TimeMs; 4] = [1, MS_PER_SECOND, MS_PER_MINUTE, MS_PER_HOUR];

        let count = self.component_count();
        let mut total: TimeMs = 0;
        for (unit_idx, group) in (1..=count).rev().enumerate() {
            let raw = caps.get(group).map(|m| m.as_str()).unwrap_or_default();
            let value: TimeMs = raw
                .parse()
                .map_err(|_| TimestampFormatError::InvalidNumber {
                    text: text.to_string(),
                    value: raw.to_string(),
                })?;
            total = value
                .checked_mul(UNITS[unit_idx])
                .and_then(|scaled| total.checked_add(scaled))
                .ok_or_else(|| TimestampFormatError::Overflow(text.to_string()))?;
        }
        Ok(total)
    }

    /// Collects every timestamp of this format found in `text`
    fn parse_all(self, text: &str) -> Result<Vec<TimeMs>, TimestampFormatError> {
        self.regex()
            .captures_iter(text)
            .map(|caps| self.to_millis(&caps, text))
            .collect()
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HoursMinutesSeconds => f.write_str("H:MM:SS.mmm"),
            Self::MinutesSeconds => f.write_str("MM:SS.mmm"),
            Self::Seconds => f.write_str("SS.mmm"),
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

fn parse_exactly(text: &str, expected: usize) -> Result<Vec<TimeMs>, TimestampFormatError> {
    let format = TimestampFormat::classify(text)
        .ok_or_else(|| TimestampFormatError::Unrecognized(text.to_string()))?;

    let values = format.parse_all(text)?;
    if values.len() != expected {
        return Err(TimestampFormatError::WrongCount {
            text: text.to_string(),
            expected,
            found: values.len(),
        });
    }
    Ok(values)
}

/// Parses a timestamp range such as `"00:01.000 --> 00:04.000"` into
/// `(start_ms, end_ms)`.
///
/// The arrow itself is not inspected; the range must contain exactly two
/// timestamps of the classified format.
pub fn parse_time_range(text: &str) -> Result<(TimeMs, TimeMs), TimestampFormatError> {
    let values = parse_exactly(text, 2)?;
    Ok((values[0], values[1]))
}

/// Parses a single timestamp such as `"01:23.456"` into milliseconds
pub fn parse_timestamp(text: &str) -> Result<TimeMs, TimestampFormatError> {
    let values = parse_exactly(text, 1)?;
    Ok(values[0])
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats milliseconds as `MM:SS.mmm`, or `HH:MM:SS.mmm` once hours are non-zero.
///
/// Hours are zero-padded to two digits but never truncated.
pub fn format_timestamp(ms: TimeMs) -> String {
    let fraction = ms % MS_PER_SECOND;
    let total_secs = ms / MS_PER_SECOND;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    if hours == 0 {
        format!("{:02}:{:02}.{:03}", mins, secs, fraction)
    } else {
        format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, fraction)
    }
}

/// Formats a cue timing line (`start --> end`)
pub fn format_time_range(start_ms: TimeMs, end_ms: TimeMs) -> String {
    format!("{} --> {}", format_timestamp(start_ms), format_timestamp(end_ms))
}

// =============================================================================
// Tests
// =============================================================================
