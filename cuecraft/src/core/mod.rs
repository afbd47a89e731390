//! Cuecraft Core Engine
//!
//! Caption parsing, re-chunking and export, plus the settings and file
//! plumbing the command-line front end builds on.

pub mod captions;
pub mod fs;
pub mod settings;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;
