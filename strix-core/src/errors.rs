//! errors.rs - Custom error types for the strix-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//! Validation misses are never errors: validators return `Ok(false)`.
//!
//! License: MIT OR Apache-2.0

use thiserror::Error;

use crate::config::PatternKind;

/// This enum represents all possible error types in the `strix-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StrixError {
    /// A required argument (search values, markers) was empty.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The pattern installed for `kind` does not compile.
    #[error("Failed to compile the configured {kind} pattern: {source}")]
    PatternCompilation {
        kind: PatternKind,
        #[source]
        source: Box<fancy_regex::Error>,
    },

    /// The pattern for `kind` compiled but failed while matching (e.g. backtrack limit).
    #[error("Failed to evaluate the configured {kind} pattern: {source}")]
    PatternEvaluation {
        kind: PatternKind,
        #[source]
        source: Box<fancy_regex::Error>,
    },

    #[error("Failed to build locator pattern '{0}': {1}")]
    LocatorPattern(String, regex::Error),

    #[error("Failed to run extraction pattern '{0}': {1}")]
    ExtractionPattern(String, Box<fancy_regex::Error>),

    #[error(transparent)]
    Crypto(#[from] strix_crypto::CryptoError),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),
}
