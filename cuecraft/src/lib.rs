//! Cuecraft Core Library
//!
//! Reads WebVTT caption files into an in-memory [`Document`](core::captions::Document),
//! optionally re-chunking long transcript lines and oversized cues, and writes
//! canonical WebVTT back out.
//!
//! ```rust,ignore
//! use cuecraft_lib::core::captions::{parse_file, ParseOptions, SplitOptions};
//!
//! let options = ParseOptions::default().with_split(SplitOptions::lines(2));
//! let parsed = parse_file("talk.vtt", &options)?;
//! print!("{}", parsed.document);
//! ```
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the binary.

pub mod core;
