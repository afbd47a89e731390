use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use cuecraft_lib::core::captions::export_vtt;
use cuecraft_lib::core::fs::atomic_write_bytes;
use cuecraft_lib::core::settings::AppSettings;

use crate::cli::{accept_document, read_document};

/// Parses `input` and writes canonical WebVTT to `output` (or `out` when absent).
pub fn run(
    input: &Path,
    output: Option<&Path>,
    settings: &AppSettings,
    strict: bool,
    out: &mut impl Write,
) -> Result<()> {
    let parsed = read_document(input, &settings.parse_options())?;
    let document = accept_document(parsed, input, strict)?;
    let vtt = export_vtt(&document);

    match output {
        Some(path) => {
            atomic_write_bytes(path, vtt.as_bytes())
                .with_context(|| format!("write {}", path.display()))?;
            tracing::info!("Wrote {} cues to {}", document.captions().count(), path.display());
        }
        None => {
            out.write_all(vtt.as_bytes()).context("write stdout")?;
            out.flush().context("flush stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const LONG_CUE: &str = "WEBVTT

00:00.000 --> 00:05.000
this is
a test
of multiple
lines in
a scene
";

    fn write_input(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("in.vtt");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_convert_to_stdout() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LONG_CUE);
        let mut out: Vec<u8> = Vec::new();

        run(&input, None, &AppSettings::default(), false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), LONG_CUE);
    }

    #[test]
    fn test_convert_with_split_to_file() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LONG_CUE);
        let output = dir.path().join("out").join("split.vtt");

        let mut settings = AppSettings::default();
        settings.cue_split.enabled = true;
        settings.cue_split.max_lines_per_cue = 2;

        let mut out: Vec<u8> = Vec::new();
        run(&input, Some(&output), &settings, false, &mut out).unwrap();

        assert!(out.is_empty());
        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "WEBVTT

00:00.000 --> 00:01.666
this is
a test

00:01.666 --> 00:03.332
of multiple
lines in

00:03.332 --> 00:05.000
a scene
"
        );
    }

    #[test]
    fn test_convert_strict_rejects_bad_timestamp() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "WEBVTT\n\n1.0.0 --> 00:02.000\ntext\n");
        let output = dir.path().join("out.vtt");

        let mut out: Vec<u8> = Vec::new();
        let result = run(&input, Some(&output), &AppSettings::default(), true, &mut out);

        assert!(result.is_err());
        assert!(!output.exists());
    }
}
