// strix-core/src/locator.rs
//! Text location primitives: delimited extraction, any-of prefix/suffix tests
//! and multi-word search.
//!
//! All offsets in returned [`MatchSpan`]s are byte offsets into the input the
//! caller passed in.
//!
//! The prefix/suffix tests compile their alternation in multi-line mode, so
//! `^` and `$` bind at every line boundary rather than only at the ends of the
//! input: `starts_with_any("first\nsecond", &["second"], ..)` is `true`.
//!
//! License: MIT OR Apache-2.0

use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

use crate::errors::StrixError;
use crate::match_span::{log_spans_debug, MatchSpan};

/// Upper bound on re-narrowing passes in recursive [`find_between`].
pub const MAX_NARROWING_STEPS: usize = 256;

const LOCATOR_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Case-folding regime for the ignore-case locator operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Culture {
    /// Full Unicode simple case folding (`straße` vs `STRASSE` aside).
    #[default]
    Invariant,
    /// ASCII-only folding; non-ASCII letters only match themselves.
    ///
    /// The pattern is compiled with Unicode mode off, so value fragments that
    /// could match arbitrary bytes (such as `.`) are rejected.
    Ascii,
}

impl Culture {
    fn unicode(self) -> bool {
        matches!(self, Culture::Invariant)
    }
}

/// Finds the text strictly between `start_marker` and `end_marker`.
///
/// Both markers are matched literally. Each match begins right after an
/// occurrence of `start_marker` and extends to the last `end_marker` on the
/// same line, so the result is the maximal run, not the shortest. Every match
/// is returned in scan order.
///
/// With `recursive`, if the first match still contains `start_marker` the
/// search repeats on that match plus its closing `end_marker`, until the first
/// match is bounded by the last start marker before the end marker. Every pass
/// works on a strictly shorter slice, and at most [`MAX_NARROWING_STEPS`]
/// passes are made.
///
/// # Errors
///
/// [`StrixError::InvalidArgument`] if either marker is empty.
pub fn find_between(
    s: &str,
    start_marker: &str,
    end_marker: &str,
    recursive: bool,
) -> Result<Vec<MatchSpan>, StrixError> {
    if start_marker.is_empty() || end_marker.is_empty() {
        return Err(StrixError::InvalidArgument(
            "find_between requires non-empty start and end markers".to_string(),
        ));
    }

    let pattern = format!(
        "(?<={}).*(?={})",
        fancy_regex::escape(start_marker),
        fancy_regex::escape(end_marker)
    );
    let regex = fancy_regex::Regex::new(&pattern)
        .map_err(|e| StrixError::ExtractionPattern(pattern.clone(), Box::new(e)))?;

    let mut window = s;
    let mut base = 0usize;
    let mut steps = 0usize;

    loop {
        let spans = scan_between(&regex, &pattern, window, base)?;

        let narrowed = match spans.first() {
            Some(first) if recursive && first.text.contains(start_marker) => {
                &s[first.start..first.end() + end_marker.len()]
            }
            _ => {
                log_spans_debug(module_path!(), "find_between", &spans);
                return Ok(spans);
            }
        };

        if narrowed.len() >= window.len() {
            warn!("find_between narrowing stopped shrinking after {} step(s).", steps);
            return Ok(spans);
        }
        steps += 1;
        if steps >= MAX_NARROWING_STEPS {
            warn!(
                "find_between reached {} narrowing steps; returning the current matches.",
                MAX_NARROWING_STEPS
            );
            return Ok(spans);
        }

        debug!(
            "find_between narrowing from {} to {} bytes at offset {}.",
            window.len(),
            narrowed.len(),
            spans[0].start
        );
        base = spans[0].start;
        window = narrowed;
    }
}

fn scan_between(
    regex: &fancy_regex::Regex,
    pattern: &str,
    window: &str,
    base: usize,
) -> Result<Vec<MatchSpan>, StrixError> {
    regex
        .find_iter(window)
        .map(|found| {
            let found =
                found.map_err(|e| StrixError::ExtractionPattern(pattern.to_string(), Box::new(e)))?;
            Ok(MatchSpan::new(base + found.start(), found.as_str()))
        })
        .collect()
}

/// Whether any line of `s` starts with one of `values`.
///
/// `values` are regex fragments, inserted verbatim into `^v1|^v2|...`;
/// duplicates are dropped. Matching is multi-line.
///
/// # Errors
///
/// [`StrixError::InvalidArgument`] if `values` is empty, and
/// [`StrixError::LocatorPattern`] if the fragments do not form a valid pattern.
pub fn starts_with_any<V: AsRef<str>>(
    s: &str,
    values: &[V],
    ignore_case: bool,
    culture: Culture,
) -> Result<bool, StrixError> {
    let pattern = distinct(values)?
        .iter()
        .map(|value| format!("^{}", value))
        .collect::<Vec<_>>()
        .join("|");
    let regex = build_line_regex(&pattern, ignore_case, culture)?;
    Ok(regex.is_match(s))
}

/// Whether any line of `s` ends with one of `values`.
///
/// The suffix counterpart of [`starts_with_any`]: builds `v1$|v2$|...`.
pub fn ends_with_any<V: AsRef<str>>(
    s: &str,
    values: &[V],
    ignore_case: bool,
    culture: Culture,
) -> Result<bool, StrixError> {
    let pattern = distinct(values)?
        .iter()
        .map(|value| format!("{}$", value))
        .collect::<Vec<_>>()
        .join("|");
    let regex = build_line_regex(&pattern, ignore_case, culture)?;
    Ok(regex.is_match(s))
}

/// Finds every occurrence of any of `words`, case-insensitively.
///
/// Words are matched literally and are not wrapped in word boundaries, so
/// `"test"` also matches inside `"attest"`. Where words overlap at the same
/// position the one listed first wins.
///
/// # Errors
///
/// [`StrixError::InvalidArgument`] if `words` holds no non-empty word.
pub fn contains_words<W: AsRef<str>>(s: &str, words: &[W]) -> Result<Vec<MatchSpan>, StrixError> {
    let escaped: Vec<String> = words
        .iter()
        .map(|word| word.as_ref())
        .filter(|word| !word.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        return Err(StrixError::InvalidArgument(
            "contains_words requires at least one non-empty word".to_string(),
        ));
    }

    let pattern = escaped.join("|");
    let regex = build_line_regex(&pattern, true, Culture::Invariant)?;
    let spans: Vec<MatchSpan> = regex
        .find_iter(s)
        .map(|found| MatchSpan::new(found.start(), found.as_str()))
        .collect();

    log_spans_debug(module_path!(), "contains_words", &spans);
    Ok(spans)
}

/// Substring test with optional case sensitivity.
pub fn contains(s: &str, sub: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        s.contains(sub)
    } else {
        s.to_lowercase().contains(&sub.to_lowercase())
    }
}

fn distinct<V: AsRef<str>>(values: &[V]) -> Result<Vec<&str>, StrixError> {
    if values.is_empty() {
        return Err(StrixError::InvalidArgument(
            "an empty values list cannot be located".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    Ok(values
        .iter()
        .map(|value| value.as_ref())
        .filter(|value| seen.insert(*value))
        .collect())
}

fn build_line_regex(pattern: &str, ignore_case: bool, culture: Culture) -> Result<Regex, StrixError> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .case_insensitive(ignore_case)
        .unicode(culture.unicode())
        .size_limit(LOCATOR_SIZE_LIMIT)
        .build()
        .map_err(|e| StrixError::LocatorPattern(pattern.to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_between_simple() {
        let spans = find_between("Hello, <span>World</span>!", "<span>", "</span>", false).unwrap();
        assert_eq!(spans, vec![MatchSpan::new(13, "World")]);
    }

    #[test]
    fn test_find_between_rejects_empty_markers() {
        assert!(matches!(
            find_between("abc", "", "c", false),
            Err(StrixError::InvalidArgument(_))
        ));
        assert!(matches!(
            find_between("abc", "a", "", true),
            Err(StrixError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_distinct_drops_duplicates() {
        assert_eq!(distinct(&["a", "b", "a"]).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_contains_case_option() {
        assert!(contains("Hello, World!", "world", false));
        assert!(!contains("Hello, World!", "world", true));
        assert!(contains("Hello, World!", "World", true));
    }

    #[test]
    fn test_ascii_culture_folds_ascii_only() {
        assert!(starts_with_any("Hello", &["hello"], true, Culture::Ascii).unwrap());
        assert!(starts_with_any("ÉCOLE", &["école"], true, Culture::Invariant).unwrap());
        assert!(!starts_with_any("ÉCOLE", &["école"], true, Culture::Ascii).unwrap());
    }
}
