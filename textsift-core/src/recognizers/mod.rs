//! Recognizer compilation for TextSift.
//!
//! This module is responsible for compiling recognizer rules into efficient
//! regular expressions ready for application to sanitized input. It handles
//! currency-marker substitution and caches compiled rule sets so repeated
//! extractor construction with the same configuration is cheap.
//!
//! This module works closely with `config` (for rule definitions) and
//! `extraction_match` (for result types).

pub mod compiler;
