// File: strix-core/src/validators.rs
//! Syntactic validation of emails, IP addresses, URLs, dates and integers.
//!
//! Email, IP and URL checks run the pattern currently configured for their
//! kind (see [`crate::patterns::registry`]). A miss is `Ok(false)`, never an
//! error; only a malformed configured pattern produces `Err`. Nothing here
//! touches the network.
//!
//! License: MIT OR Apache-2.0

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::PatternKind;
use crate::errors::StrixError;
use crate::match_span::get_loggable_content;
use crate::patterns::compiler::get_or_compile_pattern;
use crate::patterns::registry::{PatternRegistry, PatternSource};

static NUMERIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-[0-9]+$|^[0-9]+$").expect("static numeric pattern is valid"));

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// Validates strings against the patterns of a [`PatternSource`].
///
/// Built over the global registry by default; pass a
/// [`PatternSet`](crate::PatternSet) snapshot to validate a batch against one
/// consistent set of patterns.
#[derive(Debug)]
pub struct Validator<'a, S: PatternSource + ?Sized = PatternRegistry> {
    source: &'a S,
}

impl<S: PatternSource + ?Sized> Clone for Validator<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: PatternSource + ?Sized> Copy for Validator<'_, S> {}

impl Validator<'static, PatternRegistry> {
    /// A validator reading the process-wide registry.
    pub fn global() -> Self {
        Self::new(PatternRegistry::global())
    }
}

impl<'a, S: PatternSource + ?Sized> Validator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Whether `s` matches the email pattern.
    ///
    /// The default pattern anchors with `^` and `\z`, so a trailing `\n` or `\r`
    /// fails. Anchoring at the start is left to the configured pattern.
    pub fn is_email(&self, s: &str) -> Result<bool, StrixError> {
        let pattern = self.source.pattern(PatternKind::Email);
        self.matches(PatternKind::Email, &pattern, s)
    }

    /// Whether the IP pattern matches anywhere in `s`.
    ///
    /// `"foo 192.168.1.1 bar"` is accepted: the match is not anchored.
    pub fn is_ip_address(&self, s: &str) -> Result<bool, StrixError> {
        let pattern = self.source.pattern(PatternKind::Ip);
        self.matches(PatternKind::Ip, &pattern, s)
    }

    /// Whether the whole of `s` matches the URL pattern.
    pub fn is_url(&self, s: &str) -> Result<bool, StrixError> {
        let pattern = format!(r"\A(?:{})\z", self.source.pattern(PatternKind::Url));
        self.matches(PatternKind::Url, &pattern, s)
    }

    fn matches(&self, kind: PatternKind, pattern: &str, s: &str) -> Result<bool, StrixError> {
        if s.is_empty() {
            return Ok(false);
        }

        let regex = get_or_compile_pattern(pattern).map_err(|e| StrixError::PatternCompilation {
            kind,
            source: Box::new(e),
        })?;

        let matched = regex.is_match(s).map_err(|e| StrixError::PatternEvaluation {
            kind,
            source: Box::new(e),
        })?;

        debug!(
            "{} check of '{}': {}",
            kind,
            get_loggable_content(s),
            if matched { "match" } else { "no match" }
        );
        Ok(matched)
    }
}

/// Checks `s` against the global email pattern.
pub fn is_email(s: &str) -> Result<bool, StrixError> {
    Validator::global().is_email(s)
}

/// Checks `s` for an IP address anywhere, using the global IP pattern.
pub fn is_ip_address(s: &str) -> Result<bool, StrixError> {
    Validator::global().is_ip_address(s)
}

/// Checks `s` against the global URL pattern.
pub fn is_url(s: &str) -> Result<bool, StrixError> {
    Validator::global().is_url(s)
}

/// Whether `s` parses as a date or date-time in a common format.
///
/// Accepts RFC 3339, RFC 2822 and the ISO, US (`12/31/1971`) and long-month
/// (`31 December 1999`, `July 4, 1776`) layouts in `DATE_FORMATS` and
/// `DATETIME_FORMATS`. Unparseable input is `false`, never an error.
pub fn is_date(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }

    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_rfc2822(s).is_ok()
        || DATE_FORMATS
            .iter()
            .any(|format| NaiveDate::parse_from_str(s, format).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(s, format).is_ok())
}

/// Whether `s` is an optionally negative run of ASCII digits.
pub fn is_numeric(s: &str) -> bool {
    NUMERIC_REGEX.is_match(s)
}
