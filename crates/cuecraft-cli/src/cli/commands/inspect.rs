use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use cuecraft_lib::core::captions::{describe, export_vtt, Document};
use cuecraft_lib::core::settings::AppSettings;

use crate::cli::{accept_document, read_document};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InspectFormat {
    /// Cue listing with raw millisecond bounds, silence included
    Text,
    /// The parsed document as JSON
    Json,
    /// Canonical WebVTT
    Vtt,
}

impl InspectFormat {
    /// Reads the persisted `output.format` value; unknown values fall back to text
    pub fn from_settings(settings: &AppSettings) -> Self {
        match settings.output.format.as_str() {
            "json" => Self::Json,
            "vtt" => Self::Vtt,
            _ => Self::Text,
        }
    }
}

pub fn run(
    input: &Path,
    format: Option<InspectFormat>,
    settings: &AppSettings,
    strict: bool,
    out: &mut impl Write,
) -> Result<()> {
    let parsed = read_document(input, &settings.parse_options())?;
    let document = accept_document(parsed, input, strict)?;

    let format = format.unwrap_or_else(|| InspectFormat::from_settings(settings));
    let rendered = render(&document, format, settings.output.pretty_json)?;

    out.write_all(rendered.as_bytes()).context("write stdout")?;
    out.flush().context("flush stdout")?;
    Ok(())
}

fn render(document: &Document, format: InspectFormat, pretty_json: bool) -> Result<String> {
    Ok(match format {
        InspectFormat::Text => describe(document),
        InspectFormat::Vtt => export_vtt(document),
        InspectFormat::Json => {
            let mut json = if pretty_json {
                serde_json::to_string_pretty(document)
            } else {
                serde_json::to_string(document)
            }
            .context("serialize document")?;
            json.push('\n');
            json
        }
    })
}
