//! WebVTT Parser State Machine
//!
//! Turns a sequence of text lines into a [`Document`].
//!
//! Every line after the `WEBVTT` header is classified once into a [`LineKind`]
//! and then drives a transition of [`ParserState`]:
//!
//! ```text
//!            NOTE                 blank
//!   ┌──────────────────▶ InNote ───────────┐
//!   │                                      ▼
//! Idle ◀───────────────────────────────── Idle
//!   │      timestamp                blank (append cue)
//!   └──────────────────▶ InCue ───────────▶ Idle
//!                         │  ▲
//!                         └──┘ text (word-wrapped into the cue)
//! ```
//!
//! Gaps longer than [`SILENCE_GAP_TOLERANCE_MS`] between consecutive cues are
//! recorded as silence cues.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, trace, warn};

use super::timestamp::parse_time_range;
use super::{Cue, Document, LineError, ParseOptions, ParsedDocument};
use crate::core::{CoreResult, LineNumber, TimeMs};

/// Gaps between cues up to this length are not recorded as silence
pub const SILENCE_GAP_TOLERANCE_MS: TimeMs = 50;

// =============================================================================
// Line Classification
// =============================================================================

fn header_regex() -> &'static Regex {
    static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();
    HEADER_REGEX
        .get_or_init(|| Regex::new(r"^\s*WEBVTT").expect("Failed to compile WEBVTT header regex"))
}

fn note_regex() -> &'static Regex {
    static NOTE_REGEX: OnceLock<Regex> = OnceLock::new();
    NOTE_REGEX.get_or_init(|| Regex::new(r"^\s*NOTE(\s|$)").expect("Failed to compile NOTE regex"))
}

fn timestamp_line_regex() -> &'static Regex {
    static TIMESTAMP_LINE_REGEX: OnceLock<Regex> = OnceLock::new();
    TIMESTAMP_LINE_REGEX.get_or_init(|| {
        Regex::new(r"^\s*[0-9:.]+\s+-+>\s+[0-9:.]+\s*$")
            .expect("Failed to compile timestamp line regex")
    })
}

/// Returns true for the `WEBVTT` signature line (a leading BOM is allowed)
pub fn is_header_line(line: &str) -> bool {
    header_regex().is_match(line.trim_start_matches('\u{FEFF}'))
}

/// Kind of a line following the header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace only
    Blank,
    /// Start of a `NOTE` comment block
    Note,
    /// `<time> --> <time>` cue timing line
    TimestampRange,
    /// Anything else (cue text, cue identifiers, unknown blocks)
    Text,
}

impl LineKind {
    /// Classifies a single line
    pub fn classify(line: &str) -> Self {
        if line.trim().is_empty() {
            Self::Blank
        } else if note_regex().is_match(line) {
            Self::Note
        } else if timestamp_line_regex().is_match(line) {
            Self::TimestampRange
        } else {
            Self::Text
        }
    }
}

/// Parser position between, inside, or after blocks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParserState {
    /// Between blocks
    #[default]
    Idle,
    /// Inside a `NOTE` block
    InNote,
    /// Inside a cue's transcript
    InCue,
}

// =============================================================================
// Parser
// =============================================================================

/// Line-driven WebVTT parser.
///
/// Feed lines with [`VttParser::feed_line`] and call [`VttParser::finish`]
/// at end of input.
#[derive(Debug)]
pub struct VttParser {
    options: ParseOptions,
    state: ParserState,
    header_seen: bool,
    line_number: LineNumber,
    prev_end_ms: TimeMs,
    current: Cue,
    document: Document,
    errors: Vec<LineError>,
}

impl VttParser {
    /// Creates a parser with explicit options
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            state: ParserState::Idle,
            header_seen: false,
            line_number: 0,
            prev_end_ms: 0,
            current: Cue::default(),
            document: Document::new(options),
            errors: Vec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Returns true once the `WEBVTT` header has been consumed
    pub fn header_seen(&self) -> bool {
        self.header_seen
    }

    /// Consumes one line (without its terminator)
    pub fn feed_line(&mut self, line: &str) -> CoreResult<()> {
        self.line_number += 1;
        let line = line.strip_suffix('\r').unwrap_or(line);

        if !self.header_seen {
            if is_header_line(line) {
                self.header_seen = true;
            } else {
                trace!("Skipping line {} before header", self.line_number);
            }
            return Ok(());
        }

        match (self.state, LineKind::classify(line)) {
            (ParserState::Idle, LineKind::Blank) => {}
            (ParserState::Idle, LineKind::Note) => self.state = ParserState::InNote,
            (ParserState::Idle, LineKind::TimestampRange) => self.open_cue(line),
            (ParserState::Idle, LineKind::Text) => {
                trace!("Ignoring line {} outside of a cue", self.line_number);
            }
            (ParserState::InNote, LineKind::Blank) => self.state = ParserState::Idle,
            (ParserState::InNote, _) => {}
            (ParserState::InCue, LineKind::Blank) => self.close_cue()?,
            (ParserState::InCue, _) => self.current.push_text(line),
        }
        Ok(())
    }

    /// Ends the input, closing a pending cue
    pub fn finish(mut self) -> CoreResult<ParsedDocument> {
        if self.state == ParserState::InCue {
            self.close_cue()?;
        }
        if !self.header_seen {
            warn!(
                "No WEBVTT header found in {} line(s); document is empty",
                self.line_number
            );
        }
        Ok(ParsedDocument {
            document: self.document,
            errors: self.errors,
        })
    }

    fn open_cue(&mut self, line: &str) {
        let (start_ms, end_ms) = match parse_time_range(line) {
            Ok(range) => range,
            Err(error) => {
                warn!("Time range parsing failed on line {}: {}", self.line_number, error);
                self.errors.push(LineError {
                    line: self.line_number,
                    text: line.to_string(),
                    error,
                });
                (0, 0)
            }
        };

        if start_ms > self.prev_end_ms && start_ms - self.prev_end_ms > SILENCE_GAP_TOLERANCE_MS {
            self.document.append_silence(self.prev_end_ms, start_ms);
        }

        debug!("Opening cue {}~{}ms at line {}", start_ms, end_ms, self.line_number);
        self.current = Cue::new(start_ms, end_ms, self.options.wrap);
        self.state = ParserState::InCue;
    }

    fn close_cue(&mut self) -> CoreResult<()> {
        let cue = std::mem::take(&mut self.current);
        // A degraded (zeroed) cue must not move the gap reference backwards.
        self.prev_end_ms = self.prev_end_ms.max(cue.end_ms);

        let (start_ms, end_ms) = (cue.start_ms, cue.end_ms);
        if !self.document.append_cue(cue)? {
            debug!("Dropped empty or zero-length cue {}~{}ms", start_ms, end_ms);
        }
        self.state = ParserState::Idle;
        Ok(())
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Parses an in-memory sequence of lines
pub fn parse_lines<I, S>(lines: I, options: &ParseOptions) -> CoreResult<ParsedDocument>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = VttParser::new(*options);
    for line in lines {
        parser.feed_line(line.as_ref())?;
    }
    parser.finish()
}

/// Parses WebVTT text
pub fn parse_str(content: &str, options: &ParseOptions) -> CoreResult<ParsedDocument> {
    parse_lines(content.lines(), options)
}

/// Parses WebVTT from a reader; read errors are returned unchanged
pub fn parse_reader<R: BufRead>(reader: R, options: &ParseOptions) -> CoreResult<ParsedDocument> {
    let mut parser = VttParser::new(*options);
    for line in reader.lines() {
        parser.feed_line(&line?)?;
    }
    parser.finish()
}

/// Parses a WebVTT file
pub fn parse_file(path: impl AsRef<Path>, options: &ParseOptions) -> CoreResult<ParsedDocument> {
    let path = path.as_ref();
    debug!("Parsing WebVTT file {:?}", path);
    let file = File::open(path)?;
    parse_reader(BufReader::new(file), options)
}

// =============================================================================
// Tests
// =============================================================================
