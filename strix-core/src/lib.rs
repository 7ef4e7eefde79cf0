// strix-core/src/lib.rs
//! # Strix Core Library
//!
//! `strix-core` validates and locates structured text. It keeps a process-wide
//! registry of replaceable email, IP and URL patterns, classifies strings
//! against them, and provides extraction primitives over plain text. String
//! encryption comes from the `strix-crypto` crate and is re-exported here.
//!
//! ## Modules
//!
//! * `config`: Pattern kinds, built-in default patterns and YAML override files.
//! * `patterns`: The global `PatternRegistry` and the compiled-pattern cache.
//! * `validators`: Email, IP, URL, date and integer checks.
//! * `locator`: `find_between`, `starts_with_any`, `ends_with_any`, `contains_words`.
//! * `match_span`: The `MatchSpan` result type and redacted debug logging.
//! * `errors`: The `StrixError` enum.
//!
//! ## Usage Example
//!
//! ```rust
//! use strix_core::{find_between, is_email, is_ip_address, StrixError};
//!
//! fn main() -> Result<(), StrixError> {
//!     assert!(is_email("joe@home.org")?);
//!     assert!(is_ip_address("gateway at 192.168.1.1")?);
//!
//!     let spans = find_between("Hello, <span>World</span>!", "<span>", "</span>", false)?;
//!     assert_eq!(spans[0].text, "World");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! A validation miss is `Ok(false)`. Empty required arguments, malformed
//! configured patterns and bad cipher input surface as [`StrixError`]. Loading
//! configuration files returns `anyhow::Result` with file context attached.
//!
//! ## Logging
//!
//! Diagnostics go through the `log` facade. Matched text is redacted and
//! fingerprinted in debug output unless `STRIX_ALLOW_DEBUG_PII=true` is set.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod errors;
pub mod locator;
pub mod match_span;
pub mod patterns;
pub mod validators;

/// Re-exports pattern kinds, defaults and the override file format.
pub use config::{
    merge_configs,
    PatternConfig,
    PatternKind,
    PatternSet,
    DEFAULT_EMAIL_PATTERN,
    DEFAULT_IP_PATTERN,
    DEFAULT_URL_PATTERN,
};

pub use errors::StrixError;

pub use match_span::{redact_sensitive, sample_fingerprint, MatchSpan};

/// Re-exports the registry and its global accessors.
pub use patterns::registry::{get_pattern, set_pattern, PatternRegistry, PatternSource};

pub use validators::{is_date, is_email, is_ip_address, is_numeric, is_url, Validator};

pub use locator::{
    contains,
    contains_words,
    ends_with_any,
    find_between,
    starts_with_any,
    Culture,
    MAX_NARROWING_STEPS,
};

/// Re-exports string encryption from `strix-crypto`.
pub use strix_crypto::{decrypt, decrypt_full, encrypt, CryptoError, EncryptedBlob};
