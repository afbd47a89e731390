//! Caption Data Models
//!
//! Defines data structures for parsed WebVTT documents.
//!
//! # Overview
//!
//! - [`Cue`]: a timed block of transcript lines
//! - [`Document`]: the ordered cues of one WebVTT stream plus the options used to build it
//! - [`ParseOptions`]: word-wrap and cue-split configuration, passed explicitly to every parse

use serde::{Deserialize, Serialize};

use super::splitter::CueSplitter;
use crate::core::{CoreResult, LineNumber, TimeMs};

use super::TimestampFormatError;

// =============================================================================
// Options
// =============================================================================

/// Word-wrap configuration applied to each transcript line before storage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapOptions {
    /// Whether long lines are broken into several transcript entries
    #[serde(default)]
    pub enabled: bool,
    /// Maximum number of space-separated words per transcript entry
    #[serde(default = "default_max_tokens_per_line")]
    pub max_tokens_per_line: usize,
}

fn default_max_tokens_per_line() -> usize {
    5
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            max_tokens_per_line: default_max_tokens_per_line(),
        }
    }
}

impl WrapOptions {
    /// Enabled word-wrap with the given word limit
    pub fn words(max_tokens_per_line: usize) -> Self {
        Self {
            enabled: true,
            max_tokens_per_line,
        }
    }

    /// Word limit, never below one
    pub fn effective_max_tokens(&self) -> usize {
        self.max_tokens_per_line.max(1)
    }
}

/// Cue-split configuration applied when a finished cue is appended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitOptions {
    /// Whether cues with too many transcript lines are subdivided
    #[serde(default)]
    pub enabled: bool,
    /// Maximum number of transcript lines per cue
    #[serde(default = "default_max_lines_per_cue")]
    pub max_lines_per_cue: usize,
}

fn default_max_lines_per_cue() -> usize {
    2
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            max_lines_per_cue: default_max_lines_per_cue(),
        }
    }
}

impl SplitOptions {
    /// Enabled splitting with the given line limit
    pub fn lines(max_lines_per_cue: usize) -> Self {
        Self {
            enabled: true,
            max_lines_per_cue,
        }
    }

    /// Line limit, never below one
    pub fn effective_max_lines(&self) -> usize {
        self.max_lines_per_cue.max(1)
    }
}

/// Full parse configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptions {
    #[serde(default)]
    pub wrap: WrapOptions,
    #[serde(default)]
    pub split: SplitOptions,
}

impl ParseOptions {
    pub fn with_wrap(mut self, wrap: WrapOptions) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn with_split(mut self, split: SplitOptions) -> Self {
        self.split = split;
        self
    }
}

// =============================================================================
// Cue Entry
// =============================================================================

/// A single timed cue
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    /// Start time in milliseconds
    pub start_ms: TimeMs,
    /// End time in milliseconds
    pub end_ms: TimeMs,
    /// Transcript lines, empty only for silence cues
    #[serde(default)]
    pub transcript: Vec<String>,
    /// Word-wrap options used when lines were added
    #[serde(default)]
    pub wrap: WrapOptions,
}

impl Cue {
    /// Creates an empty cue with the given timing
    pub fn new(start_ms: TimeMs, end_ms: TimeMs, wrap: WrapOptions) -> Self {
        Self {
            start_ms,
            end_ms,
            transcript: Vec::new(),
            wrap,
        }
    }

    /// Creates a silence cue covering a gap between two cues
    pub fn silence(start_ms: TimeMs, end_ms: TimeMs) -> Self {
        Self::new(start_ms, end_ms, WrapOptions::default())
    }

    /// Sets the transcript lines verbatim
    pub fn with_transcript<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transcript = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one transcript line; empty lines are not stored
    pub fn push_line(&mut self, line: impl Into<String>) -> bool {
        let line = line.into();
        if line.is_empty() {
            return false;
        }
        self.transcript.push(line);
        true
    }

    /// Adds a line of cue text, word-wrapped by this cue's options
    pub fn push_text(&mut self, text: &str) {
        for line in super::wrap::wrap_line(text, &self.wrap) {
            self.push_line(line);
        }
    }

    /// Returns the duration in milliseconds (zero when end precedes start)
    pub fn duration_ms(&self) -> TimeMs {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Returns true for synthetic gap cues without transcript
    pub fn is_silence(&self) -> bool {
        self.transcript.is_empty()
    }

    /// Returns true if the cue is shown at the given time
    pub fn is_visible_at(&self, time_ms: TimeMs) -> bool {
        time_ms >= self.start_ms && time_ms < self.end_ms
    }

    /// Returns true if this cue can be kept in a document
    pub fn is_retainable(&self) -> bool {
        !self.transcript.is_empty() && self.end_ms > self.start_ms
    }

    /// Returns the transcript joined with newlines
    pub fn text(&self) -> String {
        self.transcript.join("\n")
    }
}

// =============================================================================
// Document
// =============================================================================

/// An ordered list of cues parsed from one WebVTT stream
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Cues in appearance (and chronological) order
    cues: Vec<Cue>,
    /// Options the document was built with
    #[serde(default)]
    pub options: ParseOptions,
}

impl Document {
    /// Creates an empty document
    pub fn new(options: ParseOptions) -> Self {
        Self {
            cues: Vec::new(),
            options,
        }
    }

    /// Appends a finished cue.
    ///
    /// Cues without transcript or without positive duration are dropped and
    /// `false` is returned. When splitting is enabled an oversized cue is
    /// replaced by its sub-cues.
    pub fn append_cue(&mut self, cue: Cue) -> CoreResult<bool> {
        if !cue.is_retainable() {
            return Ok(false);
        }

        if self.options.split.enabled {
            let splitter = CueSplitter::new(self.options.split.effective_max_lines());
            self.cues.extend(splitter.split(cue)?);
        } else {
            self.cues.push(cue);
        }
        Ok(true)
    }

    /// Appends a silence cue directly, bypassing the splitter.
    ///
    /// Zero-length gaps are ignored.
    pub fn append_silence(&mut self, start_ms: TimeMs, end_ms: TimeMs) -> bool {
        if end_ms <= start_ms {
            return false;
        }
        self.cues.push(Cue::silence(start_ms, end_ms));
        true
    }

    /// All cues, silence included
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Consumes the document, returning its cues
    pub fn into_cues(self) -> Vec<Cue> {
        self.cues
    }

    /// Cues that carry transcript
    pub fn captions(&self) -> impl Iterator<Item = &Cue> {
        self.cues.iter().filter(|c| !c.is_silence())
    }

    /// Synthetic gap cues
    pub fn silences(&self) -> impl Iterator<Item = &Cue> {
        self.cues.iter().filter(|c| c.is_silence())
    }

    /// Returns cues visible at the given time
    pub fn cues_at(&self, time_ms: TimeMs) -> Vec<&Cue> {
        self.cues
            .iter()
            .filter(|c| c.is_visible_at(time_ms))
            .collect()
    }

    /// Returns the end time of the last cue
    pub fn duration_ms(&self) -> TimeMs {
        self.cues.last().map(|c| c.end_ms).unwrap_or(0)
    }

    /// Returns the transcript of every cue, one line per entry
    pub fn full_text(&self) -> String {
        self.captions()
            .map(Cue::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns the number of cues, silence included
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Returns true if the document has no cues
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

// =============================================================================
// Parse Result
// =============================================================================

/// A recoverable error tied to an input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineError {
    /// 1-based line number
    pub line: LineNumber,
    /// The offending line
    pub text: String,
    pub error: TimestampFormatError,
}

/// A parsed document together with the recoverable errors met on the way
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub document: Document,
    pub errors: Vec<LineError>,
}

impl ParsedDocument {
    /// Returns true when every timestamp line was read cleanly
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the document, or the first recorded error
    pub fn into_strict(self) -> CoreResult<Document> {
        match self.errors.into_iter().next() {
            Some(err) => Err(crate::core::CoreError::TimestampFormatAt {
                line: err.line,
                source: err.error,
            }),
            None => Ok(self.document),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Options Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert!(!options.wrap.enabled);
        assert_eq!(options.wrap.max_tokens_per_line, 5);
        assert!(!options.split.enabled);
        assert_eq!(options.split.max_lines_per_cue, 2);
    }

    #[test]
    fn test_effective_limits_never_zero() {
        assert_eq!(WrapOptions::words(0).effective_max_tokens(), 1);
        assert_eq!(SplitOptions::lines(0).effective_max_lines(), 1);
        assert_eq!(SplitOptions::lines(4).effective_max_lines(), 4);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ParseOptions = serde_json::from_str(r#"{"split":{"enabled":true}}"#).unwrap();
        assert!(options.split.enabled);
        assert_eq!(options.split.max_lines_per_cue, 2);
        assert_eq!(options.wrap, WrapOptions::default());
    }

    // -------------------------------------------------------------------------
    // Cue Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_cue_creation() {
        let cue = Cue::new(1_000, 4_000, WrapOptions::default()).with_transcript(["Hello"]);
        assert_eq!(cue.start_ms, 1_000);
        assert_eq!(cue.end_ms, 4_000);
        assert_eq!(cue.duration_ms(), 3_000);
        assert_eq!(cue.text(), "Hello");
        assert!(!cue.is_silence());
    }

    #[test]
    fn test_cue_push_line_skips_empty() {
        let mut cue = Cue::default();
        assert!(!cue.push_line(""));
        assert!(cue.push_line("text"));
        assert_eq!(cue.transcript, vec!["text"]);
    }

    #[test]
    fn test_cue_push_text_wraps() {
        let mut cue = Cue::new(0, 1_000, WrapOptions::words(2));
        cue.push_text("one two three");
        assert_eq!(cue.transcript, vec!["one two", "three"]);
    }

    #[test]
    fn test_cue_visibility() {
        let cue = Cue::new(2_000, 5_000, WrapOptions::default());
        assert!(!cue.is_visible_at(1_999));
        assert!(cue.is_visible_at(2_000));
        assert!(cue.is_visible_at(4_999));
        assert!(!cue.is_visible_at(5_000));
    }

    #[test]
    fn test_cue_duration_saturates() {
        let cue = Cue::new(5_000, 1_000, WrapOptions::default());
        assert_eq!(cue.duration_ms(), 0);
    }

    // -------------------------------------------------------------------------
    // Document Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_append_drops_degenerate_cues() {
        let mut doc = Document::default();

        let empty = Cue::new(0, 1_000, WrapOptions::default());
        assert!(!doc.append_cue(empty).unwrap());

        let zero = Cue::new(1_000, 1_000, WrapOptions::default()).with_transcript(["x"]);
        assert!(!doc.append_cue(zero).unwrap());

        let backwards = Cue::new(2_000, 1_000, WrapOptions::default()).with_transcript(["x"]);
        assert!(!doc.append_cue(backwards).unwrap());

        assert!(doc.is_empty());
    }

    #[test]
    fn test_append_splits_when_enabled() {
        let mut doc = Document::new(ParseOptions::default().with_split(SplitOptions::lines(2)));
        let cue = Cue::new(0, 3_000, WrapOptions::default()).with_transcript(["a", "b", "c"]);

        assert!(doc.append_cue(cue).unwrap());
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.cues()[0].transcript, vec!["a", "b"]);
        assert_eq!(doc.cues()[1].transcript, vec!["c"]);
    }

    #[test]
    fn test_append_keeps_cue_when_split_disabled() {
        let mut doc = Document::default();
        let cue = Cue::new(0, 3_000, WrapOptions::default()).with_transcript(["a", "b", "c"]);

        assert!(doc.append_cue(cue).unwrap());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_append_silence() {
        let mut doc = Document::default();
        assert!(!doc.append_silence(1_000, 1_000));
        assert!(doc.append_silence(1_000, 2_000));
        assert_eq!(doc.silences().count(), 1);
        assert_eq!(doc.captions().count(), 0);
    }

    #[test]
    fn test_document_queries() {
        let mut doc = Document::default();
        doc.append_cue(Cue::new(0, 2_000, WrapOptions::default()).with_transcript(["Hello"]))
            .unwrap();
        doc.append_silence(2_000, 3_000);
        doc.append_cue(Cue::new(3_000, 5_000, WrapOptions::default()).with_transcript(["World"]))
            .unwrap();

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.duration_ms(), 5_000);
        assert_eq!(doc.full_text(), "Hello\nWorld");
        assert_eq!(doc.cues_at(2_500).len(), 1);
        assert!(doc.cues_at(2_500)[0].is_silence());
    }

    // -------------------------------------------------------------------------
    // Parse Result Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_into_strict_reports_first_error() {
        let parsed = ParsedDocument {
            document: Document::default(),
            errors: vec![LineError {
                line: 3,
                text: "bad --> line".to_string(),
                error: TimestampFormatError::Unrecognized("bad --> line".to_string()),
            }],
        };
        assert!(!parsed.is_clean());

        let err = parsed.into_strict().unwrap_err();
        assert!(matches!(
            err,
            crate::core::CoreError::TimestampFormatAt { line: 3, .. }
        ));
    }

    // -------------------------------------------------------------------------
    // Serialization Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_cue_serialization() {
        let cue = Cue::new(1_500, 4_500, WrapOptions::default()).with_transcript(["Hello World"]);
        let json = serde_json::to_string(&cue).unwrap();
        assert!(json.contains("\"startMs\":1500"));

        let parsed: Cue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cue);
    }
}
