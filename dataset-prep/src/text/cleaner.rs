//! Whitespace normalization applied by every loader.

/// Collapse every run of whitespace into a single space and trim the ends.
///
/// Newlines, tabs and Unicode spaces (NBSP and friends) all count as
/// whitespace, so a paragraph that spans several source lines comes out as
/// one line. Normalizing an already-normalized string is a no-op.
pub fn normalize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for word in text.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }

    result
}
