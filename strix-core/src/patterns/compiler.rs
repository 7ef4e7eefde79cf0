//! compiler.rs - Compiles and caches registry patterns.
//!
//! Registry patterns are PCRE-like (lookaround, `\z`, `\b`), so they are built
//! with `fancy_regex`, which delegates the plain parts to the `regex` crate.
//! Compiled programs live in a thread-safe, global cache keyed by the pattern
//! text itself. The cache holds at most [`MAX_CACHED_PATTERNS`] entries; when
//! a new pattern arrives at a full cache, the cache is emptied first. Callers
//! keep their `Arc` handles across an eviction.
//!
//! License: MIT OR Apache-2.0

use fancy_regex::{Regex, RegexBuilder};
use lazy_static::lazy_static;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Size limit for the compiled `regex` programs `fancy_regex` delegates to.
pub const DELEGATE_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Upper bound on distinct patterns held in the compiled cache.
pub const MAX_CACHED_PATTERNS: usize = 64;

lazy_static! {
    /// A thread-safe, global cache of compiled patterns, keyed by pattern text.
    static ref COMPILED_PATTERN_CACHE: RwLock<HashMap<String, Arc<Regex>>> = RwLock::new(HashMap::new());
}

/// Compiles a single pattern without touching the cache.
pub fn compile_pattern(pattern: &str) -> Result<Regex, fancy_regex::Error> {
    debug!("Compiling pattern of {} chars.", pattern.len());
    RegexBuilder::new(pattern)
        .delegate_size_limit(DELEGATE_SIZE_LIMIT)
        .build()
}

/// Gets a compiled pattern from the cache, compiling and caching it on a miss.
///
/// Failed compilations are not cached; the error is returned on every attempt.
pub fn get_or_compile_pattern(pattern: &str) -> Result<Arc<Regex>, fancy_regex::Error> {
    {
        let cache = COMPILED_PATTERN_CACHE
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(regex) = cache.get(pattern) {
            return Ok(Arc::clone(regex));
        }
    }

    let compiled = Arc::new(compile_pattern(pattern)?);

    let mut cache = COMPILED_PATTERN_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    if cache.len() >= MAX_CACHED_PATTERNS && !cache.contains_key(pattern) {
        debug!(
            "Pattern cache full ({} entries); evicting all compiled patterns.",
            cache.len()
        );
        cache.clear();
    }
    cache.insert(pattern.to_string(), Arc::clone(&compiled));
    drop(cache);

    debug!("Cached compiled pattern ({} chars).", pattern.len());
    Ok(compiled)
}

/// Number of distinct patterns currently cached.
pub fn cached_pattern_count() -> usize {
    COMPILED_PATTERN_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_returns_same_program() {
        let a = get_or_compile_pattern(r"cache-test-\d+").unwrap();
        let b = get_or_compile_pattern(r"cache-test-\d+").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(cached_pattern_count() >= 1);
    }

    #[test]
    fn test_lookaround_is_supported() {
        let regex = compile_pattern(r"(?<=\$)\d+(?=\.)").unwrap();
        let found = regex.find("price: $42.00").unwrap().unwrap();
        assert_eq!(found.as_str(), "42");
    }

    #[test]
    fn test_invalid_pattern_is_not_cached() {
        assert!(get_or_compile_pattern("(unclosed").is_err());
        assert!(get_or_compile_pattern("(unclosed").is_err());
    }
}
