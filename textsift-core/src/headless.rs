// textsift-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for using the extraction engine in headless mode
//! (non-UI). Provides helper functions for a full, one-shot extraction
//! from a string, and for rendering the wire-form JSON the external
//! collaborator expects.

use serde_json::json;

use crate::config::ExtractionConfig;
use crate::errors::SiftError;
use crate::extractor::{ExtractionResult, Extractor};

/// Fully processes an input string: sanitize, extract, mask, deduplicate.
/// This function is the primary entry point for non-interactive use.
///
/// # Arguments
///
/// * `config` - The merged ExtractionConfig (defaults + optional user overrides).
/// * `content` - The raw text to process.
pub fn extract_string(
    config: &ExtractionConfig,
    content: &str,
) -> Result<ExtractionResult, SiftError> {
    let extractor = Extractor::new(config)?;
    extractor.extract_all(content)
}

/// One-shot extraction rendered as the JSON wire form.
///
/// On success this is the six-key result object; on failure it is the
/// single error object `{"error": <message>}`. The two forms are mutually
/// exclusive.
pub fn extract_to_json(config: &ExtractionConfig, content: &str) -> String {
    match extract_string(config, content) {
        Ok(result) => serde_json::to_string(&result)
            .unwrap_or_else(|e| json!({ "error": e.to_string() }).to_string()),
        Err(e) => json!({ "error": e.to_string() }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitizer::MAX_INPUT_CHARS;

    #[test]
    fn test_extract_string_masks_and_collects() -> anyhow::Result<()> {
        let config = ExtractionConfig::load_default_rules()?;
        let content = "Reach gatete@example.rw or see https://igihe.com/news today.";

        let result = extract_string(&config, content)?;
        assert_eq!(result.emails, vec!["g***@example.rw".to_string()]);
        assert_eq!(result.urls, vec!["https://igihe.com/news".to_string()]);
        assert!(result.credit_cards.is_empty());
        Ok(())
    }

    #[test]
    fn test_extract_to_json_success_form() -> anyhow::Result<()> {
        let config = ExtractionConfig::load_default_rules()?;
        let json = extract_to_json(&config, "Lunch at 12:15 PM.");

        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["times"], json!(["12:15 PM"]));
        assert!(value.get("error").is_none());
        Ok(())
    }

    #[test]
    fn test_extract_to_json_error_form() -> anyhow::Result<()> {
        let config = ExtractionConfig::load_default_rules()?;
        let oversized = "x".repeat(MAX_INPUT_CHARS + 1);
        let json = extract_to_json(&config, &oversized);

        let value: serde_json::Value = serde_json::from_str(&json)?;
        let message = value["error"].as_str().unwrap();
        assert!(message.contains("too large"));
        assert!(value.get("emails").is_none());
        Ok(())
    }
}
