//! Caption Exporters
//!
//! Renders a [`Document`] back to text:
//! - canonical WebVTT ([`export_vtt`])
//! - a plain cue listing for inspection ([`describe`])
//!
//! # Example
//!
//! ```rust,ignore
//! use cuecraft_lib::core::captions::{parse_str, export_vtt, ParseOptions};
//!
//! let parsed = parse_str(&content, &ParseOptions::default())?;
//! assert_eq!(export_vtt(&parsed.document), content);
//! ```

use std::fmt;

use super::timestamp::format_time_range;
use super::Document;

/// Header line of every exported WebVTT document
pub const VTT_HEADER: &str = "WEBVTT";

// =============================================================================
// VTT Format
// =============================================================================

/// Exports a document to canonical WebVTT.
///
/// # Output
///
/// ```text
/// WEBVTT
///
/// 00:01.000 --> 00:04.000
/// First caption text
///
/// 00:05.000 --> 00:09.000
/// Second caption text
/// with multiple lines
/// ```
///
/// Silence cues carry no transcript and are not written.
pub fn export_vtt(document: &Document) -> String {
    let mut output = String::from(VTT_HEADER);
    output.push('\n');

    for cue in document.captions() {
        output.push('\n');
        output.push_str(&format_time_range(cue.start_ms, cue.end_ms));
        output.push('\n');
        for line in &cue.transcript {
            output.push_str(line);
            output.push('\n');
        }
    }

    output
}

impl Document {
    /// Exports this document to canonical WebVTT
    pub fn to_vtt(&self) -> String {
        export_vtt(self)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&export_vtt(self))
    }
}

// =============================================================================
// Cue Listing
// =============================================================================

/// Lists every cue (silence included) with raw millisecond bounds.
///
/// ```text
///
/// Starts: 1000,  Ends: 4000
/// This is subtitle at 1sec to 4sec.
/// ```
pub fn describe(document: &Document) -> String {
    let mut output = String::new();
    for cue in document.cues() {
        output.push_str(&format!("\nStarts: {},\tEnds: {}\n", cue.start_ms, cue.end_ms));
        for line in &cue.transcript {
            output.push_str(line);
            output.push('\n');
        }
    }
    output
}

// =============================================================================
// Tests
// =============================================================================
