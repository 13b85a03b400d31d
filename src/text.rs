//! Helpful utilities for working with text.

use htmlentity::entity::{self, ICodedDataTrait};

/// Longest excerpt kept from comment bodies and subreddit descriptions.
pub const EXCERPT_LENGTH: usize = 200;

/// Appended to text that has been cut short.
pub const ELLIPSIS: &str = "...";

/// Converts HTML entities into their single-character equivalents.
///
/// For example, Reddit returns "&" as "&amp;", ">" as "&gt;",
/// and "<" as "&lt;"; this function will convert those HTML
/// entities into single, human-readable characters.
///
/// Leading and trailing whitespace will also be trimmed from the string.
///
/// # Examples
///
/// ```
/// use redcrawl::text::convert_html_entities;
/// let raw = "  &lt;This &amp; That&gt;  ";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, "<This & That>");
/// ```
///
/// ```
/// use redcrawl::text::convert_html_entities;
/// let raw = "A Plaintext Post";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, raw);
/// ```
pub fn convert_html_entities(text: &str) -> String {
    let text = text.trim();
    entity::decode(text.as_bytes())
        .to_string()
        .unwrap_or(text.to_string())
}

/// Shortens `text` to at most `max_chars` characters, appending
/// [`ELLIPSIS`] if anything was cut.
///
/// Lengths are counted in characters, not bytes, so multi-byte text is
/// never split in the middle of a character.
///
/// # Examples
///
/// ```
/// use redcrawl::text::truncate;
/// assert_eq!(truncate("a short comment", 200), "a short comment");
/// assert_eq!(truncate("abcdef", 3), "abc...");
/// ```
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}{ELLIPSIS}", &text[..end]),
        None => text.to_string(),
    }
}

/// Decodes entities in `text` and shortens it to [`EXCERPT_LENGTH`].
pub fn excerpt(text: &str) -> String {
    truncate(&convert_html_entities(text), EXCERPT_LENGTH)
}
