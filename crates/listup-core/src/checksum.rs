//! Embedded checksum markers and content checksums.
//!
//! A filter list may declare its own checksum in a comment line such as
//! `! Checksum: 6b3a...`. The checksum is computed over the list with that
//! declaration line removed, after stripping `\r` and collapsing runs of
//! newlines, so the publisher never has to solve for a value that covers itself.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

static CHECKSUM_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*![ \t]*checksum[ \t\-:]+([\w+/=]+).*(?:\n|$)")
        .expect("checksum marker pattern is valid")
});

/// Hash function used to derive the computed checksum of a document.
pub trait ContentHasher {
    /// Digest of `content` in its textual (comparable) form.
    fn digest(&self, content: &[u8]) -> String;
}

/// SHA-256 rendered as lowercase hex. The default hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl ContentHasher for Sha256Hasher {
    fn digest(&self, content: &[u8]) -> String {
        hex::encode(Sha256::digest(content))
    }
}

/// Declared and computed checksum of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumMarker {
    /// Value of the `! Checksum:` line, if the document has one. Not validated.
    pub declared: Option<String>,
    /// Checksum of the normalized content.
    pub computed: String,
}

impl ChecksumMarker {
    /// Extract the marker using the default SHA-256 hasher.
    pub fn extract(text: &str) -> Self {
        Self::extract_with(text, &Sha256Hasher)
    }

    pub fn extract_with<H: ContentHasher + ?Sized>(text: &str, hasher: &H) -> Self {
        Self {
            declared: declared_checksum(text),
            computed: compute_checksum(text, hasher),
        }
    }

    /// True iff a checksum is declared and matches the computed one (case-insensitive).
    pub fn validate(&self) -> bool {
        self.declared
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(&self.computed))
    }

    /// True iff the computed checksum equals `external` (case-insensitive).
    pub fn validate_against(&self, external: &str) -> bool {
        self.computed.eq_ignore_ascii_case(external)
    }
}

/// First `! Checksum:` value in the document.
pub fn declared_checksum(text: &str) -> Option<String> {
    CHECKSUM_LINE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Text the checksum is computed over: `\r` removed, blank line runs collapsed,
/// checksum declaration lines removed.
pub fn normalize_for_checksum(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut prev_newline = false;
    for c in text.chars() {
        match c {
            '\r' => {}
            '\n' if prev_newline => {}
            '\n' => {
                prev_newline = true;
                collapsed.push(c);
            }
            _ => {
                prev_newline = false;
                collapsed.push(c);
            }
        }
    }
    CHECKSUM_LINE.replace_all(&collapsed, "").into_owned()
}

pub fn compute_checksum<H: ContentHasher + ?Sized>(text: &str, hasher: &H) -> String {
    hasher.digest(normalize_for_checksum(text).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_declared(body: &str) -> String {
        let sum = compute_checksum(body, &Sha256Hasher);
        format!("! Checksum: {sum}\n{body}")
    }

    #[test]
    fn sha256_hasher_known_content() {
        assert_eq!(
            Sha256Hasher.digest(b"hello\n"),
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }

    #[test]
    fn computed_is_deterministic() {
        let text = "! Title: A\n||ads.example^\n";
        assert_eq!(
            ChecksumMarker::extract(text).computed,
            ChecksumMarker::extract(text).computed
        );
    }

    #[test]
    fn declared_value_is_extracted_case_insensitively() {
        assert_eq!(
            declared_checksum("! Title: x\n!  CHECKSUM - AbC123==\nrule\n").as_deref(),
            Some("AbC123==")
        );
        assert_eq!(declared_checksum("rule\n! Title: x\n"), None);
    }

    #[test]
    fn checksum_line_is_excluded_from_computation() {
        let body = "! Title: A\n||ads.example^\n";
        let doc = with_declared(body);
        assert_eq!(
            compute_checksum(&doc, &Sha256Hasher),
            compute_checksum(body, &Sha256Hasher)
        );
    }

    #[test]
    fn line_endings_and_blank_lines_do_not_change_checksum() {
        let unix = "! Title: A\n||a^\n||b^\n";
        let dos = "! Title: A\r\n\r\n||a^\r\n\n\n||b^\r\n";
        assert_eq!(
            compute_checksum(unix, &Sha256Hasher),
            compute_checksum(dos, &Sha256Hasher)
        );
    }

    #[test]
    fn validate_true_for_matching_declared_checksum() {
        let doc = with_declared("||ads.example^\n");
        assert!(ChecksumMarker::extract(&doc).validate());
    }

    #[test]
    fn validate_ignores_hex_case() {
        let body = "||ads.example^\n";
        let sum = compute_checksum(body, &Sha256Hasher).to_uppercase();
        let doc = format!("! Checksum: {sum}\n{body}");
        assert!(ChecksumMarker::extract(&doc).validate());
    }

    #[test]
    fn validate_false_when_content_changed() {
        let doc = with_declared("||ads.example^\n") + "||tampered^\n";
        assert!(!ChecksumMarker::extract(&doc).validate());
    }

    #[test]
    fn validate_false_without_declared_checksum() {
        assert!(!ChecksumMarker::extract("||ads.example^\n").validate());
    }

    #[test]
    fn validate_against_external() {
        let marker = ChecksumMarker::extract("||ads.example^\n");
        let upper = marker.computed.to_uppercase();
        assert!(marker.validate_against(&upper));
        assert!(!marker.validate_against("deadbeef"));
    }
}
