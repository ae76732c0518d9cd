// textsift-core/src/extraction_match.rs
//! Provides core data structures and utility functions for managing
//! extraction matches and sensitive-data logging within the
//! `textsift-core` library.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::EntityKind;

lazy_static! {
    /// A static boolean that is initialized once to determine if PII is allowed in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("TEXTSIFT_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// Represents a single instance of a matched entity.
///
/// `output_string` is what the caller receives: the raw match for most
/// kinds, the masked form for rules with `mask_output` set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionMatch {
    pub kind: EntityKind,
    pub original_string: String,
    pub output_string: String,
    pub start: u64,
    pub end: u64,
    #[serde(default)]
    pub sample_hash: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Masks the local part of an email address for display.
///
/// All but the first character of the local part is replaced with `***`;
/// a single-character local part is replaced entirely. The domain is
/// preserved verbatim. Strings without an `@` are returned unchanged.
///
/// Masking is pure and irreversible.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let mut chars = local.chars();
            match chars.next() {
                Some(first) if chars.next().is_some() => format!("{first}***@{domain}"),
                _ => format!("***@{domain}"),
            }
        }
        None => email.to_string(),
    }
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_captured_match_debug(module_path: &str, kind: EntityKind, original_content: &str) {
    debug!(
        "{} Captured match for kind '{}': '{}'",
        module_path,
        kind,
        get_loggable_content(original_content)
    );
}

/// A stable content hash for a match: kind id plus whitespace/case
/// normalized snippet.
pub fn canonical_sample_hash(kind: EntityKind, snippet: &str) -> String {
    let normalized = snippet
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(kind.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn ensure_match_hashes(matches: &mut [ExtractionMatch]) {
    for m in matches.iter_mut() {
        if m.sample_hash.is_none() {
            let hash = canonical_sample_hash(m.kind, &m.original_string);
            m.sample_hash = Some(hash);
        }
    }
}
