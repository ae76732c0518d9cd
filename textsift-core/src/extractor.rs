// textsift-core/src/extractor.rs
//! The entity extraction engine: runs every compiled recognizer over
//! sanitized text and assembles the per-kind result sequences.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::config::{EntityKind, ExtractionConfig};
use crate::errors::SiftError;
use crate::extraction_match::{
    ensure_match_hashes, log_captured_match_debug, mask_email, ExtractionMatch,
};
use crate::recognizers::compiler::{get_or_compile_rules, CompiledRecognizers};
use crate::sanitizer::{InputSanitizer, SanitizedText};

/// The structured output of one extraction call.
///
/// Every kind is present, as an empty sequence when nothing matched.
/// Sequences are deduplicated per kind; their order is first-seen scan
/// order but is not semantically meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub emails: Vec<String>,
    pub urls: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub credit_cards: Vec<String>,
    pub times: Vec<String>,
    pub currency_amounts: Vec<String>,
    /// Set when the sanitizer redacted a script tag. A side-channel signal
    /// for the caller, kept out of the serialized form.
    #[serde(skip)]
    pub script_redacted: bool,
}

impl ExtractionResult {
    /// The result sequence for one entity kind.
    pub fn entries(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Email => &self.emails,
            EntityKind::Url => &self.urls,
            EntityKind::PhoneNumber => &self.phone_numbers,
            EntityKind::CreditCard => &self.credit_cards,
            EntityKind::Time => &self.times,
            EntityKind::CurrencyAmount => &self.currency_amounts,
        }
    }

    fn entries_mut(&mut self, kind: EntityKind) -> &mut Vec<String> {
        match kind {
            EntityKind::Email => &mut self.emails,
            EntityKind::Url => &mut self.urls,
            EntityKind::PhoneNumber => &mut self.phone_numbers,
            EntityKind::CreditCard => &mut self.credit_cards,
            EntityKind::Time => &mut self.times,
            EntityKind::CurrencyAmount => &mut self.currency_amounts,
        }
    }

    /// True when no kind matched anything.
    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|k| self.entries(*k).is_empty())
    }
}

/// The extraction engine.
///
/// Holds one compiled recognizer per active entity kind plus the input
/// sanitizer. Stateless across calls; the compiled recognizers are shared
/// and never mutated, so an `Extractor` is safe to use from concurrent
/// callers.
#[derive(Debug, Clone)]
pub struct Extractor {
    compiled: Arc<CompiledRecognizers>,
    sanitizer: InputSanitizer,
}

impl Extractor {
    /// Builds an extractor from a configuration, compiling (or reusing
    /// cached) recognizers.
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        Self::with_sanitizer(config, InputSanitizer::new())
    }

    /// Builds an extractor with the embedded default rule set.
    pub fn from_default_rules() -> Result<Self> {
        let config = ExtractionConfig::load_default_rules()?;
        Self::new(&config)
    }

    pub fn with_sanitizer(config: &ExtractionConfig, sanitizer: InputSanitizer) -> Result<Self> {
        let compiled = get_or_compile_rules(config)
            .context("Failed to compile recognizer rules for Extractor")?;

        Ok(Self { compiled, sanitizer })
    }

    /// Runs every recognizer over already-sanitized text and collects all
    /// non-overlapping matches, keyed by kind, in left-to-right order.
    fn find_matches(&self, content: &str) -> HashMap<EntityKind, Vec<ExtractionMatch>> {
        let mut all_matches: HashMap<EntityKind, Vec<ExtractionMatch>> = HashMap::new();

        for recognizer in &self.compiled.recognizers {
            for found in recognizer.regex.find_iter(content) {
                let original_str = found.as_str();
                log_captured_match_debug(module_path!(), recognizer.kind, original_str);

                let output_string = if recognizer.mask_output {
                    mask_email(original_str)
                } else {
                    original_str.to_string()
                };

                all_matches.entry(recognizer.kind).or_default().push(ExtractionMatch {
                    kind: recognizer.kind,
                    original_string: original_str.to_string(),
                    output_string,
                    start: found.start() as u64,
                    end: found.end() as u64,
                    sample_hash: None,
                    timestamp: Some(Utc::now().to_rfc3339()),
                });
            }
        }

        all_matches
    }

    /// Validates and sanitizes the raw input, then extracts every entity
    /// kind from it.
    ///
    /// When the sanitizer rejects the input ([`SiftError::InputTooLarge`]),
    /// the call short-circuits and no matching runs.
    pub fn extract_all(&self, text: &str) -> Result<ExtractionResult, SiftError> {
        let sanitized = self.sanitizer.validate(text)?;
        Ok(self.extract_sanitized(&sanitized))
    }

    /// Extracts every entity kind from text that has already passed
    /// through the sanitizer. Cannot fail: recognizers only match or not.
    pub fn extract_sanitized(&self, sanitized: &SanitizedText) -> ExtractionResult {
        let all_matches = self.find_matches(sanitized.as_str());

        let mut result = ExtractionResult {
            script_redacted: sanitized.script_redacted,
            ..ExtractionResult::default()
        };

        for kind in EntityKind::ALL {
            let Some(matches) = all_matches.get(&kind) else { continue };
            // Deduplication is per kind, over the post-masking output.
            let mut seen: HashSet<&str> = HashSet::new();
            let entries = result.entries_mut(kind);
            for m in matches {
                if seen.insert(m.output_string.as_str()) {
                    entries.push(m.output_string.clone());
                }
            }
        }

        result
    }

    /// Finds all matches in the raw input and returns the detailed records
    /// (spans, timestamps, sample hashes), sorted by position.
    ///
    /// Unlike [`extract_all`](Self::extract_all), nothing is deduplicated
    /// here; every hit is reported.
    pub fn find_matches_for_report(&self, text: &str) -> Result<Vec<ExtractionMatch>, SiftError> {
        let sanitized = self.sanitizer.validate(text)?;
        let all_map = self.find_matches(sanitized.as_str());
        let mut out: Vec<ExtractionMatch> = all_map.into_values().flatten().collect();
        ensure_match_hashes(&mut out);
        out.sort_by_key(|m| (m.start, m.kind));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_has_every_kind_empty() {
        let result = ExtractionResult::default();
        assert!(result.is_empty());
        for kind in EntityKind::ALL {
            assert!(result.entries(kind).is_empty());
        }
    }

    #[test]
    fn result_serializes_with_all_six_keys() {
        let result = ExtractionResult::default();
        let json: serde_json::Value = serde_json::to_value(&result).unwrap();
        let object = json.as_object().unwrap();
        for key in ["emails", "urls", "phone_numbers", "credit_cards", "times", "currency_amounts"] {
            assert!(object.contains_key(key), "missing key {key}");
            assert!(object[key].as_array().unwrap().is_empty());
        }
        assert!(!object.contains_key("script_redacted"));
    }
}
