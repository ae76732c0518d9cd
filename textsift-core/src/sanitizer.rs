//! sanitizer.rs - Input validation and script-tag redaction.
//!
//! The sanitizer is the leaf component of the extraction pipeline: it
//! enforces the per-call input size cap and strips `<script>` blocks from
//! text that may later be rendered as HTML. It is not an HTML parser; it
//! only recognizes the literal `<script>` token shape.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::errors::SiftError;

/// Maximum number of characters accepted per extraction call.
///
/// The cap bounds worst-case work per call before any pattern matching runs.
pub const MAX_INPUT_CHARS: usize = 10_000;

/// Replacement token emitted in place of a redacted `<script>` block.
pub const DEFAULT_REDACTION_TOKEN: &str = "[REDACTED]";

/// Case-insensitive opening `<script ...>` tag, non-greedy up to the
/// closing `>`.
static SCRIPT_OPEN_TAG: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"<script.*?>")
        .case_insensitive(true)
        .build()
        .unwrap()
});

/// A full `<script ...>...</script>` block. The body is non-greedy and the
/// dot matches newlines, so multi-line blocks are redacted as one span.
static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"<script.*?>.*?</script>")
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .unwrap()
});

/// Text that has passed size validation and script-tag redaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedText {
    text: String,
    /// True when at least one script tag was found and redacted. A signal
    /// for the caller, not an error.
    pub script_redacted: bool,
}

impl SanitizedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Validates input size and redacts `<script>` content.
#[derive(Debug, Clone)]
pub struct InputSanitizer {
    redaction_token: String,
}

impl Default for InputSanitizer {
    fn default() -> Self {
        Self {
            redaction_token: DEFAULT_REDACTION_TOKEN.to_string(),
        }
    }
}

impl InputSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sanitizer that redacts with a custom token.
    pub fn with_redaction_token(token: impl Into<String>) -> Self {
        Self {
            redaction_token: token.into(),
        }
    }

    /// Validates the input and returns it with script blocks redacted.
    ///
    /// Fails with [`SiftError::InputTooLarge`] when the text exceeds
    /// [`MAX_INPUT_CHARS`] characters. Text without a script tag is
    /// returned unchanged.
    pub fn validate(&self, text: &str) -> Result<SanitizedText, SiftError> {
        let char_count = text.chars().count();
        if char_count > MAX_INPUT_CHARS {
            return Err(SiftError::InputTooLarge(char_count));
        }

        if SCRIPT_OPEN_TAG.is_match(text) {
            warn!("Security alert: found a script tag in the input; redacting it.");
            let redacted = SCRIPT_BLOCK
                .replace_all(text, self.redaction_token.as_str())
                .into_owned();
            return Ok(SanitizedText {
                text: redacted,
                script_redacted: true,
            });
        }

        debug!("Input passed sanitization unchanged ({} chars).", char_count);
        Ok(SanitizedText {
            text: text.to_string(),
            script_redacted: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_is_returned_unchanged() {
        let sanitizer = InputSanitizer::new();
        let input = "Just a plain sentence with an email a@b.com in it.";
        let sanitized = sanitizer.validate(input).unwrap();
        assert_eq!(sanitized.as_str(), input);
        assert!(!sanitized.script_redacted);
    }

    #[test]
    fn script_block_is_redacted() {
        let sanitizer = InputSanitizer::new();
        let input = "before <script>alert('x')</script> after";
        let sanitized = sanitizer.validate(input).unwrap();
        assert_eq!(sanitized.as_str(), "before [REDACTED] after");
        assert!(sanitized.script_redacted);
    }

    #[test]
    fn multiline_mixed_case_script_block_is_redacted() {
        let sanitizer = InputSanitizer::new();
        let input = "a <ScRiPt type=\"text/javascript\">\nline one\nline two\n</SCRIPT> b";
        let sanitized = sanitizer.validate(input).unwrap();
        assert_eq!(sanitized.as_str(), "a [REDACTED] b");
        assert!(!sanitized.as_str().to_lowercase().contains("<script"));
    }

    #[test]
    fn multiple_script_blocks_are_all_redacted() {
        let sanitizer = InputSanitizer::new();
        let input = "<script>a</script> keep <script>b</script>";
        let sanitized = sanitizer.validate(input).unwrap();
        assert_eq!(sanitized.as_str(), "[REDACTED] keep [REDACTED]");
    }

    #[test]
    fn custom_redaction_token() {
        let sanitizer = InputSanitizer::with_redaction_token("<removed>");
        let sanitized = sanitizer.validate("x <script>y</script> z").unwrap();
        assert_eq!(sanitized.as_str(), "x <removed> z");
    }

    #[test]
    fn oversized_input_is_rejected_idempotently() {
        let sanitizer = InputSanitizer::new();
        let input = "a".repeat(MAX_INPUT_CHARS + 1);

        for _ in 0..2 {
            match sanitizer.validate(&input) {
                Err(SiftError::InputTooLarge(n)) => assert_eq!(n, MAX_INPUT_CHARS + 1),
                other => panic!("expected InputTooLarge, got {:?}", other.map(|s| s.script_redacted)),
            }
        }
    }

    #[test]
    fn input_at_the_cap_is_accepted() {
        let sanitizer = InputSanitizer::new();
        let input = "b".repeat(MAX_INPUT_CHARS);
        assert!(sanitizer.validate(&input).is_ok());
    }
}
