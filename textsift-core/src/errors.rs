//! errors.rs - Custom error types for the textsift-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `textsift-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SiftError {
    /// The input text exceeds the per-call character cap. Fatal to the
    /// current call; surfaced as a value, never as a panic.
    #[error("Input is too large: {0} characters exceeds the 10000-character limit")]
    InputTooLarge(usize),

    #[error("Failed to compile recognizer for kind '{0}': {1}")]
    RecognizerCompilationError(String, regex::Error),

    #[error("Recognizer '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
