//! Video identifier extraction from pasted links
//!
//! Recognizes the share, embed and watch link forms:
//! `youtu.be/<id>`, `.../v/<id>`, `.../u/<n>/<id>`, `.../embed/<id>`,
//! `?v=<id>` and `&v=<id>`. The segment after the last marker runs until the
//! first `#`, `&` or `?` and must be exactly 11 characters.

use once_cell::sync::Lazy;
use regex::Regex;

/// Length of a video identifier
pub const VIDEO_ID_LEN: usize = 11;

// The greedy prefix makes the last marker in the string win
static VIDEO_LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/[A-Za-z0-9_]/|embed/|\?v=|&v=)([^#&?]*).*")
        .expect("video link regex must compile")
});

/// Extract the 11-character video identifier from a link
///
/// Returns `None` when no marker is present or the segment after it is not
/// exactly [`VIDEO_ID_LEN`] characters. Never panics on malformed input.
pub fn extract_video_id(input: &str) -> Option<String> {
    let caps = VIDEO_LINK_REGEX.captures(input)?;
    let candidate = caps.get(2)?.as_str();

    if candidate.chars().count() == VIDEO_ID_LEN {
        Some(candidate.to_string())
    } else {
        tracing::debug!(
            "Rejected video id candidate '{}' ({} chars)",
            candidate,
            candidate.chars().count()
        );
        None
    }
}
