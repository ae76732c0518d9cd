//! compiler.rs - Manages the compilation and caching of recognizer rules.
//!
//! This module provides a thread-safe, cached mechanism to convert an
//! `ExtractionConfig` into `CompiledRecognizers`, which are optimized for
//! efficient matching. It uses a global, shared cache to avoid redundant
//! compilation.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use lazy_static::lazy_static;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::{EntityKind, ExtractionConfig, RecognizerRule, MAX_PATTERN_LENGTH};
use crate::errors::SiftError;

/// Placeholder in a rule pattern that receives the escaped currency marker.
pub const MARKER_PLACEHOLDER: &str = "{marker}";

/// Substitutes the currency marker into a pattern template.
///
/// The marker is regex-escaped, so literal markers such as `$` are safe.
/// Patterns without the placeholder are returned unchanged.
pub fn substitute_marker(pattern: &str, marker: &str) -> String {
    if pattern.contains(MARKER_PLACEHOLDER) {
        pattern.replace(MARKER_PLACEHOLDER, &regex::escape(marker))
    } else {
        pattern.to_string()
    }
}

/// Represents a single compiled recognizer.
///
/// This struct holds a compiled regular expression along with the metadata
/// the extractor needs to post-process its matches.
#[derive(Debug)]
pub struct CompiledRecognizer {
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// The entity kind this recognizer reports matches under.
    pub kind: EntityKind,
    /// A flag indicating that matches must be masked before reporting.
    pub mask_output: bool,
}

/// Represents the full set of compiled recognizers for an extraction run.
///
/// Immutable after construction; safe to share across concurrent callers.
#[derive(Debug)]
pub struct CompiledRecognizers {
    /// Recognizers in rule order, one per active entity kind.
    pub recognizers: Vec<CompiledRecognizer>,
}

lazy_static! {
    /// A thread-safe, global cache for compiled recognizers.
    /// The key is a hash of the rules and the currency marker.
    static ref COMPILED_RECOGNIZERS_CACHE: RwLock<HashMap<u64, Arc<CompiledRecognizers>>> =
        RwLock::new(HashMap::new());
}

/// Hashes the `ExtractionConfig` to create a stable, unique key for the cache.
///
/// To ensure determinism, the rules are sorted by kind before hashing. The
/// currency marker participates because it changes the compiled pattern.
fn hash_config(config: &ExtractionConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    let mut rules_to_hash = config.rules.clone();

    rules_to_hash.sort_by_key(|r| r.kind);
    rules_to_hash.hash(&mut hasher);
    config.currency_marker().hash(&mut hasher);
    hasher.finish()
}

/// Compiles a list of `RecognizerRule`s into `CompiledRecognizers`.
/// This is the low-level function that performs the actual regex compilation.
pub fn compile_rules(
    rules_to_compile: Vec<RecognizerRule>,
    currency_marker: &str,
) -> Result<CompiledRecognizers, SiftError> {
    debug!("Starting compilation of {} recognizer rules.", rules_to_compile.len());

    let mut recognizers = Vec::new();
    let mut compilation_errors = Vec::new();

    for rule in rules_to_compile {
        if let Some(false) = rule.enabled {
            debug!("Skipping disabled rule '{}'.", rule.kind);
            continue;
        }

        if rule.pattern.len() > MAX_PATTERN_LENGTH {
            compilation_errors.push(SiftError::PatternLengthExceeded(
                rule.kind.to_string(),
                rule.pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
            continue;
        }

        let pattern = substitute_marker(&rule.pattern, currency_marker);
        debug!("Attempting to compile rule '{}' with pattern '{:?}'", rule.kind, pattern);

        let regex_result = RegexBuilder::new(&pattern)
            .multi_line(rule.multiline)
            .dot_matches_new_line(rule.dot_matches_new_line)
            .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
            .build();

        match regex_result {
            Ok(regex) => {
                log::debug!(
                    target: "textsift_core::recognizers",
                    "Rule '{}' compiled successfully.",
                    rule.kind
                );
                recognizers.push(CompiledRecognizer {
                    regex,
                    kind: rule.kind,
                    mask_output: rule.mask_output,
                });
            }
            Err(e) => {
                compilation_errors.push(SiftError::RecognizerCompilationError(
                    rule.kind.to_string(),
                    e,
                ));
            }
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        Err(SiftError::Fatal(format!(
            "Failed to compile {} recognizer rule(s):\n{}",
            compilation_errors.len(),
            error_message
        )))
    } else {
        debug!("Finished compiling rules. Total compiled: {}.", recognizers.len());
        Ok(CompiledRecognizers { recognizers })
    }
}

/// Gets a `CompiledRecognizers` instance from the cache or compiles them if
/// not found.
///
/// This is the public entry point for retrieving compiled recognizers. It
/// returns an `Arc` to a `CompiledRecognizers` instance, allowing for cheap
/// sharing.
pub fn get_or_compile_rules(config: &ExtractionConfig) -> Result<Arc<CompiledRecognizers>> {
    let cache_key = hash_config(config);

    // Attempt to acquire a read lock first.
    {
        let cache = COMPILED_RECOGNIZERS_CACHE.read().unwrap();
        if let Some(recognizers) = cache.get(&cache_key) {
            debug!("Serving compiled recognizers from cache for key: {}", &cache_key);
            return Ok(Arc::clone(recognizers));
        }
    } // Read lock is released here.

    debug!("Compiled recognizers not found in cache. Compiling now.");
    let compiled = compile_rules(config.rules.clone(), config.currency_marker())?;
    let compiled_arc = Arc::new(compiled);

    COMPILED_RECOGNIZERS_CACHE
        .write()
        .unwrap()
        .insert(cache_key, Arc::clone(&compiled_arc));

    debug!("Successfully compiled and cached recognizers for key: {}", &cache_key);
    Ok(compiled_arc)
}
