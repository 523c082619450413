//! Leading `key: value` metadata blocks in page text.
//!
//! A page may start with a block of lines such as
//!
//! ```text
//! title: Installing the CMS
//! summary: Requirements and first steps
//!
//! # Installation
//! ```
//!
//! The block ends at the first blank line. Only known fields are applied.

use std::sync::LazyLock;

use regex::Regex;

/// Text up to and including the first blank line (`\r` tolerated).
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\A(.+?)\n\r*\n").unwrap());

/// `key: value` pairs inside the block.
static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<key>[A-Za-z][A-Za-z0-9_-]+)\t*:\t*(?P<value>[^:\n\r/]+)").unwrap()
});

/// Page fields that a metadata block may set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetadataField {
    /// Overrides the title derived from the filename.
    Title,
    /// Short description shown in listings.
    Summary,
}

impl MetadataField {
    /// Match a metadata key, ignoring ASCII case. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        if key.eq_ignore_ascii_case("title") {
            Some(Self::Title)
        } else if key.eq_ignore_ascii_case("summary") {
            Some(Self::Summary)
        } else {
            None
        }
    }
}

/// Values found in a metadata block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub summary: Option<String>,
}

impl Metadata {
    fn set(&mut self, field: MetadataField, value: String) {
        match field {
            MetadataField::Title => self.title = Some(value),
            MetadataField::Summary => self.summary = Some(value),
        }
    }

    /// Whether no field was set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.summary.is_none()
    }
}

/// Extract metadata from the leading block of `text`.
///
/// Returns the metadata and the text to display. The block is cut from the
/// returned text only when `remove` is set and at least one field was found;
/// otherwise `text` comes back whole.
pub fn extract(text: &str, remove: bool) -> (Metadata, &str) {
    let mut metadata = Metadata::default();

    let Some(block) = BLOCK_RE.captures(text) else {
        return (metadata, text);
    };

    for pair in PAIR_RE.captures_iter(&block[1]) {
        if let Some(field) = MetadataField::from_key(&pair["key"]) {
            let value = pair["value"].trim();
            if !value.is_empty() {
                metadata.set(field, value.to_owned());
            }
        }
    }

    if remove && !metadata.is_empty() {
        (metadata, &text[block.get(0).map_or(0, |m| m.end())..])
    } else {
        (metadata, text)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_extract_with_removal() {
        let (metadata, body) = extract("Title: Foo\nSummary: Bar\n\nBody text", true);

        assert_eq!(
            metadata,
            Metadata {
                title: Some("Foo".to_owned()),
                summary: Some("Bar".to_owned()),
            }
        );
        assert_eq!(body, "Body text");
    }

    #[test]
    fn test_extract_without_removal_keeps_text() {
        let text = "Title: Foo\nSummary: Bar\n\nBody text";

        let (metadata, body) = extract(text, false);

        assert_eq!(metadata.title.as_deref(), Some("Foo"));
        assert_eq!(metadata.summary.as_deref(), Some("Bar"));
        assert_eq!(body, text);
    }

    #[test]
    fn test_extract_tabs_around_colon() {
        let (metadata, _) = extract("title\t:\tTabbed\n\nBody", false);

        assert_eq!(metadata.title.as_deref(), Some("Tabbed"));
    }

    #[test]
    fn test_extract_crlf_blank_line() {
        let (metadata, body) = extract("title: Windows\r\n\r\nBody", true);

        assert_eq!(metadata.title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_extract_unknown_keys_ignored() {
        let text = "author: Someone\nlayout: wide\n\nBody";

        let (metadata, body) = extract(text, true);

        assert!(metadata.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_extract_no_blank_line() {
        let (metadata, body) = extract("title: Foo\nBody continues", true);

        assert!(metadata.is_empty());
        assert_eq!(body, "title: Foo\nBody continues");
    }

    #[test]
    fn test_extract_empty_text() {
        let (metadata, body) = extract("", true);

        assert!(metadata.is_empty());
        assert_eq!(body, "");
    }

    #[test]
    fn test_extract_metadata_only() {
        let (metadata, body) = extract("title: Only\n\n", true);

        assert_eq!(metadata.title.as_deref(), Some("Only"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_extract_value_stops_at_slash_and_colon() {
        let (metadata, _) = extract("summary: see docs/guide\n\nBody", false);

        assert_eq!(metadata.summary.as_deref(), Some("see docs"));
    }

    #[test]
    fn test_extract_heading_block_is_not_metadata() {
        let text = "# Heading\n\nParagraph: with a colon";

        let (metadata, body) = extract(text, true);

        assert!(metadata.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_metadata_field_from_key() {
        assert_eq!(MetadataField::from_key("Title"), Some(MetadataField::Title));
        assert_eq!(MetadataField::from_key("SUMMARY"), Some(MetadataField::Summary));
        assert_eq!(MetadataField::from_key("titles"), None);
    }
}
