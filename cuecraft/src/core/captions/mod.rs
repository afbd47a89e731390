//! Caption System Module
//!
//! Parses WebVTT into a [`Document`] of timed cues and writes it back out.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Caption System                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  timestamp.rs  - Timestamp codec (3 formats, checked math)      │
//! │  models.rs     - Data structures (Cue, Document, options)       │
//! │  wrap.rs       - Word-wrap transform for cue text               │
//! │  splitter.rs   - Time-sliced splitting of oversized cues        │
//! │  parser.rs     - Line-driven parser state machine               │
//! │  formats.rs    - Canonical WebVTT export                        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use cuecraft_lib::core::captions::{parse_file, ParseOptions, SplitOptions};
//!
//! let options = ParseOptions::default().with_split(SplitOptions::lines(2));
//! let parsed = parse_file("talk.vtt", &options)?;
//! for err in &parsed.errors {
//!     eprintln!("line {}: {}", err.line, err.error);
//! }
//! let vtt_content = parsed.document.to_vtt();
//! ```

mod formats;
mod models;
mod parser;
mod splitter;
mod timestamp;
mod wrap;

// Re-export models
pub use models::{
    Cue, Document, LineError, ParseOptions, ParsedDocument, SplitOptions, WrapOptions,
};

// Re-export codec and pipeline stages
pub use formats::{describe, export_vtt, VTT_HEADER};
pub use parser::{
    is_header_line, parse_file, parse_lines, parse_reader, parse_str, LineKind, ParserState,
    VttParser, SILENCE_GAP_TOLERANCE_MS,
};
pub use splitter::CueSplitter;
pub use timestamp::{
    format_time_range, format_timestamp, parse_time_range, parse_timestamp, TimestampFormat,
    TimestampFormatError,
};
pub use wrap::wrap_line;
