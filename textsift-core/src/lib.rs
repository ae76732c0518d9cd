// textsift-core/src/lib.rs
//! # TextSift Core Library
//!
//! `textsift-core` provides the fundamental, platform-independent logic for
//! extracting structured entities (emails, URLs, phone numbers, credit-card
//! numbers, times, currency amounts) from free-form text. It defines the
//! core data structures for recognizer rules, provides mechanisms for
//! compiling these rules, and implements the validate → extract → mask →
//! deduplicate pipeline.
//!
//! The library is designed to be pure and stateless, focusing solely on the
//! transformation of input text into structured results, without concerns
//! for I/O or application-specific state management. The interactive menu,
//! file loading, and printing of results are external collaborators that
//! call into this engine with raw text.
//!
//! ## Modules
//!
//! * `config`: Defines `RecognizerRule`s and `ExtractionConfig` for specifying entity patterns.
//! * `sanitizer`: Enforces the input size cap and redacts `<script>` blocks.
//! * `recognizers`: Contains the logic for compiling rules into ready-to-run recognizers.
//! * `extraction_match`: Defines match records, email masking, and sample hashing.
//! * `extractor`: The engine that runs every recognizer and assembles results.
//! * `headless`: Convenience wrappers for one-shot, non-interactive use.
//! * `errors`: The library error type.
//!
//! ## Usage Example
//!
//! ```rust
//! use textsift_core::{ExtractionConfig, Extractor};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     // 1. Load the default recognizer rules.
//!     let config = ExtractionConfig::load_default_rules()?;
//!
//!     // 2. Build an extractor; recognizers compile once and are cached.
//!     let extractor = Extractor::new(&config)?;
//!
//!     // 3. Run the full pipeline over raw text.
//!     let input = "Contact a@b.com or visit https://x.com. Pay Rwf 1,500.00 at 10:30 AM.";
//!     let result = extractor.extract_all(input)?;
//!
//!     assert_eq!(result.emails, vec!["***@b.com".to_string()]);
//!     assert_eq!(result.urls, vec!["https://x.com".to_string()]);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return `Result`; the extraction pipeline reports its
//! one fatal condition, [`SiftError::InputTooLarge`], as a value rather
//! than a panic, so callers in any surface handle it uniformly.
//!
//! ## Design Principles
//!
//! * **Rules as data:** Recognizer patterns live in configuration, with an
//!   embedded default set, so deployments can swap markers or disable kinds
//!   without code changes.
//! * **Stateless:** Each extraction call is self-contained; compiled
//!   recognizers are immutable and shared.
//! * **Heuristic by design:** Patterns favor predictable behavior over
//!   RFC-correct validation.
//!
//! ---
//! License: MIT OR Apache-2.0

// All modules must be declared before they can be used.
pub mod config;
pub mod errors;
pub mod extraction_match;
pub mod extractor;
pub mod headless;
pub mod recognizers;
pub mod sanitizer;

/// Re-exports the public configuration types and functions for managing recognizer rules.
pub use config::{
    merge_configs,
    validate_rules,
    EntityKind,
    ExtractionConfig,
    RecognizerRule,
    DEFAULT_CURRENCY_MARKER,
    MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::SiftError;

/// Re-exports the input sanitizer and its limits.
pub use sanitizer::{InputSanitizer, SanitizedText, DEFAULT_REDACTION_TOKEN, MAX_INPUT_CHARS};

/// Re-exports types for detailed matches and masking.
pub use extraction_match::{canonical_sample_hash, mask_email, redact_sensitive, ExtractionMatch};

/// Re-exports the extraction engine and its result type.
pub use extractor::{ExtractionResult, Extractor};

/// Re-exports functions for one-shot, non-interactive use.
pub use headless::{extract_string, extract_to_json};

// Re-export key types from the recognizers::compiler module for advanced usage.
pub use recognizers::compiler::{compile_rules, CompiledRecognizer, CompiledRecognizers};
