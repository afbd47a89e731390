//! Cue Splitter
//!
//! Subdivides a cue whose transcript has more lines than allowed into
//! consecutive sub-cues of equal duration.
//!
//! ```text
//! [0 ────────────────────────────── 5000]   5 lines, max 2 per cue
//! [0 ──── 1666][1666 ──── 3332][3332 ── 5000]
//!   2 lines      2 lines         1 line
//! ```
//!
//! The slice length is `floor(duration / segments)`; the last sub-cue always
//! ends at the original end, absorbing the division remainder.

use super::Cue;
use crate::core::{CoreError, CoreResult, TimeMs};

/// Splits cues to at most `max_lines` transcript lines each
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CueSplitter {
    max_lines: usize,
}

impl CueSplitter {
    /// Creates a splitter; a zero limit is treated as one
    pub fn new(max_lines: usize) -> Self {
        Self {
            max_lines: max_lines.max(1),
        }
    }

    /// Maximum transcript lines per produced cue
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Number of sub-cues `cue` would be split into
    pub fn segment_count(&self, cue: &Cue) -> usize {
        cue.transcript.len().div_ceil(self.max_lines)
    }

    /// Splits `cue` into time-sliced sub-cues.
    ///
    /// A cue within the limit is returned unchanged as the only element.
    pub fn split(&self, cue: Cue) -> CoreResult<Vec<Cue>> {
        let segments = self.segment_count(&cue);
        if segments <= 1 {
            return Ok(vec![cue]);
        }

        let slice_ms = cue.duration_ms() / segments as TimeMs;
        let chunk_count = cue.transcript.chunks(self.max_lines).len();

        let mut parts = Vec::with_capacity(segments);
        let mut cursor = cue.start_ms;
        for (idx, chunk) in cue.transcript.chunks(self.max_lines).enumerate() {
            let start_ms = cursor;
            let end_ms = if idx + 1 == chunk_count {
                cue.end_ms
            } else {
                start_ms + slice_ms
            };
            cursor = end_ms;
            parts.push(Cue::new(start_ms, end_ms, cue.wrap).with_transcript(chunk.iter().cloned()));
        }

        verify_tiling(&cue, segments, &parts)?;
        tracing::debug!(
            "Split cue {}~{}ms into {} segments of {}ms",
            cue.start_ms,
            cue.end_ms,
            parts.len(),
            slice_ms
        );
        Ok(parts)
    }
}

/// Checks that `parts` exactly cover `[cue.start_ms, cue.end_ms)` in `segments` pieces
fn verify_tiling(cue: &Cue, segments: usize, parts: &[Cue]) -> CoreResult<()> {
    let contiguous = parts
        .windows(2)
        .all(|pair| pair[0].end_ms == pair[1].start_ms);
    let first_start = parts.first().map(|p| p.start_ms);
    let last_end = parts.last().map(|p| p.end_ms).unwrap_or(cue.start_ms);

    if parts.len() != segments
        || !contiguous
        || first_start != Some(cue.start_ms)
        || last_end != cue.end_ms
    {
        return Err(CoreError::SplitInvariantViolation {
            start_ms: cue.start_ms,
            end_ms: cue.end_ms,
            expected_segments: segments,
            produced_segments: parts.len(),
            last_end_ms: last_end,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::captions::WrapOptions;

    fn five_line_cue() -> Cue {
        Cue::new(0, 5_000, WrapOptions::default()).with_transcript([
            "this is",
            "a test",
            "of multiple",
            "lines in",
            "a scene",
        ])
    }

    fn bounds(parts: &[Cue]) -> Vec<(TimeMs, TimeMs)> {
        parts.iter().map(|p| (p.start_ms, p.end_ms)).collect()
    }

    // -------------------------------------------------------------------------
    // Tiling Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_split_two_lines_per_cue() {
        let parts = CueSplitter::new(2).split(five_line_cue()).unwrap();

        assert_eq!(bounds(&parts), vec![(0, 1_666), (1_666, 3_332), (3_332, 5_000)]);
        assert_eq!(parts[0].transcript, vec!["this is", "a test"]);
        assert_eq!(parts[1].transcript, vec!["of multiple", "lines in"]);
        assert_eq!(parts[2].transcript, vec!["a scene"]);
    }

    #[test]
    fn test_split_three_lines_per_cue() {
        let parts = CueSplitter::new(3).split(five_line_cue()).unwrap();

        assert_eq!(bounds(&parts), vec![(0, 2_500), (2_500, 5_000)]);
        assert_eq!(parts[0].transcript, vec!["this is", "a test", "of multiple"]);
        assert_eq!(parts[1].transcript, vec!["lines in", "a scene"]);
    }

    #[test]
    fn test_split_four_lines_per_cue() {
        let parts = CueSplitter::new(4).split(five_line_cue()).unwrap();

        assert_eq!(bounds(&parts), vec![(0, 2_500), (2_500, 5_000)]);
        assert_eq!(parts[0].transcript.len(), 4);
        assert_eq!(parts[1].transcript, vec!["a scene"]);
    }

    #[test]
    fn test_no_split_at_or_under_limit() {
        for max in [5, 6, 100] {
            let parts = CueSplitter::new(max).split(five_line_cue()).unwrap();
            assert_eq!(parts, vec![five_line_cue()]);
        }
    }

    #[test]
    fn test_resplit_is_noop() {
        let splitter = CueSplitter::new(2);
        for part in splitter.split(five_line_cue()).unwrap() {
            let again = splitter.split(part.clone()).unwrap();
            assert_eq!(again, vec![part]);
        }
    }

    #[test]
    fn test_split_nonzero_start_absorbs_remainder() {
        let cue = Cue::new(10_000, 10_007, WrapOptions::default()).with_transcript(["a", "b", "c"]);
        let parts = CueSplitter::new(1).split(cue).unwrap();

        assert_eq!(
            bounds(&parts),
            vec![(10_000, 10_002), (10_002, 10_004), (10_004, 10_007)]
        );
    }

    #[test]
    fn test_split_keeps_wrap_options() {
        let cue = Cue::new(0, 1_000, WrapOptions::words(3)).with_transcript(["a", "b"]);
        let parts = CueSplitter::new(1).split(cue).unwrap();
        assert!(parts.iter().all(|p| p.wrap == WrapOptions::words(3)));
    }

    #[test]
    fn test_zero_limit_is_one() {
        let splitter = CueSplitter::new(0);
        assert_eq!(splitter.max_lines(), 1);
        assert_eq!(splitter.segment_count(&five_line_cue()), 5);
    }

    // -------------------------------------------------------------------------
    // Invariant Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_verify_tiling_rejects_short_last_segment() {
        let cue = five_line_cue();
        let parts = vec![
            Cue::new(0, 2_500, WrapOptions::default()).with_transcript(["a"]),
            Cue::new(2_500, 4_999, WrapOptions::default()).with_transcript(["b"]),
        ];

        let err = verify_tiling(&cue, 2, &parts).unwrap_err();
        assert!(matches!(
            err,
            CoreError::SplitInvariantViolation {
                last_end_ms: 4_999,
                ..
            }
        ));
    }

    #[test]
    fn test_verify_tiling_rejects_segment_mismatch() {
        let cue = five_line_cue();
        let parts = vec![Cue::new(0, 5_000, WrapOptions::default()).with_transcript(["a"])];

        let err = verify_tiling(&cue, 3, &parts).unwrap_err();
        assert!(matches!(
            err,
            CoreError::SplitInvariantViolation {
                expected_segments: 3,
                produced_segments: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_verify_tiling_rejects_gap() {
        let cue = five_line_cue();
        let parts = vec![
            Cue::new(0, 2_000, WrapOptions::default()).with_transcript(["a"]),
            Cue::new(2_500, 5_000, WrapOptions::default()).with_transcript(["b"]),
        ];
        assert!(verify_tiling(&cue, 2, &parts).is_err());
    }
}
