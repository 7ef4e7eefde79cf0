// strix-crypto/src/error.rs
//! Error types for the string encryption layer.
//!
//! License: MIT OR Apache-2.0

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while encrypting or decrypting a string payload.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CryptoError {
    /// A required input (plaintext, blob or key) was empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The key's UTF-8 encoding is not a valid AES key size.
    #[error("invalid key length: expected 16, 24 or 32 bytes, got {actual}")]
    InvalidKeyLength { actual: usize },

    /// The encoded blob is not valid base64.
    #[error("invalid base64 blob: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decoded blob is too short to hold an IV and one cipher block.
    #[error("encrypted blob too short: expected at least {expected} bytes, got {actual}")]
    TruncatedBlob { expected: usize, actual: usize },

    /// Decryption failed (wrong key or tampered data).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The recovered plaintext is not valid UTF-8.
    #[error("decrypted payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}
