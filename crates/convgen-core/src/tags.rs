//! Comment-tag extraction.
//!
//! Annotations live in comment lines of the form `+key=value` (or a bare
//! `+key`, whose value is empty). Interpretation of keys and values is left
//! to the caller.

use indexmap::IndexMap;

/// Tag values by key, in order of first appearance.
pub type CommentTags<'a> = IndexMap<&'a str, Vec<&'a str>>;

pub fn extract_comment_tags<'a>(marker: &str, lines: &'a [String]) -> CommentTags<'a> {
    let mut tags = CommentTags::new();
    for line in lines {
        let Some(rest) = line.trim().strip_prefix(marker) else {
            continue;
        };
        let (key, value) = rest.split_once('=').unwrap_or((rest, ""));
        tags.entry(key).or_default().push(value);
    }
    tags
}

/// All values of one `+key=...` tag.
pub fn tag_values<'a>(marker: &str, key: &str, lines: &'a [String]) -> Vec<&'a str> {
    extract_comment_tags(marker, lines)
        .swap_remove(key)
        .unwrap_or_default()
}
