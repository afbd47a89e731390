//! Word-wrap transform for cue text.

use super::WrapOptions;

/// Breaks one line of cue text into transcript entries.
///
/// With wrapping disabled the line is returned verbatim. Otherwise it is split
/// on single spaces and regrouped into entries of `max_tokens_per_line` words;
/// the last entry holds the remainder.
pub fn wrap_line(line: &str, options: &WrapOptions) -> Vec<String> {
    if !options.enabled {
        return vec![line.to_string()];
    }

    let tokens: Vec<&str> = line.trim_matches(' ').split(' ').collect();
    tokens
        .chunks(options.effective_max_tokens())
        .map(|chunk| chunk.join(" "))
        .filter(|entry| !entry.is_empty())
        .collect()
}
