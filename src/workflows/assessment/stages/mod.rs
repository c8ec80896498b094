//! The three analysis stages invoked by the assessment pipeline.
//!
//! Each stage owns its request construction, truncation limits, and degenerate
//! branches. Fatality rules differ per stage: style failures abort the whole
//! attempt, plagiarism and authorship degrade to fixed safe values.

pub(crate) mod authorship;
pub(crate) mod plagiarism;
pub(crate) mod style;

/// Submissions below this length are scored deterministically without
/// spending an external call.
pub(crate) const MIN_ANALYZABLE_CHARS: usize = 50;

/// Request-size caps imposed by the external services.
pub(crate) const STYLE_TEXT_LIMIT: usize = 4000;
pub(crate) const PLAGIARISM_TEXT_LIMIT: usize = 1000;
pub(crate) const BASELINE_SAMPLE_LIMIT: usize = 1500;
pub(crate) const AUTHORSHIP_TARGET_LIMIT: usize = 3000;

/// Prefix of at most `max_chars` characters, never splitting a code point.
pub(crate) fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

pub(crate) fn too_short(text: &str) -> bool {
    text.chars().count() < MIN_ANALYZABLE_CHARS
}
