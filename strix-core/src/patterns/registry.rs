// strix-core/src/patterns/registry.rs
//! The process-wide pattern registry.
//!
//! A [`PatternRegistry`] holds exactly one active pattern per [`PatternKind`].
//! The [global](PatternRegistry::global) instance starts with the built-in
//! defaults and is shared by every caller in the process; replacing a pattern
//! is visible to all subsequent validations. Patterns are stored as text and
//! are not checked when installed: a malformed pattern surfaces as
//! [`StrixError::PatternCompilation`](crate::StrixError::PatternCompilation)
//! the first time a validator uses it.
//!
//! Each replacement swaps a whole string under an `RwLock`, so readers see
//! either the old pattern or the new one. Nothing orders a batch of
//! validations against a concurrent writer; take a [`snapshot`](PatternRegistry::snapshot)
//! and validate against that when a batch must see one consistent set.

use log::{debug, info};
use once_cell::sync::Lazy;
use std::sync::{PoisonError, RwLock};

use crate::config::{PatternConfig, PatternKind, PatternSet};

static GLOBAL_REGISTRY: Lazy<PatternRegistry> = Lazy::new(PatternRegistry::new);

/// Anything validators can read patterns from.
pub trait PatternSource {
    /// The active pattern text for `kind`.
    fn pattern(&self, kind: PatternKind) -> String;
}

impl PatternSource for PatternSet {
    fn pattern(&self, kind: PatternKind) -> String {
        self.get(kind).to_string()
    }
}

/// Runtime-replaceable email, IP and URL patterns.
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: RwLock<PatternSet>,
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRegistry {
    /// A registry holding the built-in defaults.
    pub fn new() -> Self {
        Self::with_patterns(PatternSet::default())
    }

    pub fn with_patterns(patterns: PatternSet) -> Self {
        Self {
            patterns: RwLock::new(patterns),
        }
    }

    /// The registry shared by the whole process.
    pub fn global() -> &'static PatternRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn get_pattern(&self, kind: PatternKind) -> String {
        self.patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kind)
            .to_string()
    }

    /// Replaces the active pattern for `kind`. The pattern is not validated.
    pub fn set_pattern(&self, kind: PatternKind, pattern: impl Into<String>) {
        let pattern = pattern.into();
        debug!("Installing {} pattern ({} chars).", kind, pattern.len());
        self.patterns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(kind, pattern);
    }

    /// A copy of all active patterns at this instant.
    pub fn snapshot(&self) -> PatternSet {
        self.patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Restores the built-in defaults for every kind.
    pub fn reset(&self) {
        info!("Restoring built-in patterns.");
        *self.patterns.write().unwrap_or_else(PoisonError::into_inner) = PatternSet::default();
    }

    /// Installs every override present in `config`, returning how many were applied.
    ///
    /// All overrides land under a single write lock.
    pub fn apply_config(&self, config: &PatternConfig) -> usize {
        let mut patterns = self.patterns.write().unwrap_or_else(PoisonError::into_inner);
        let mut applied = 0;
        for (kind, pattern) in config.overrides() {
            patterns.set(kind, pattern.to_string());
            applied += 1;
        }
        info!("Applied {} pattern override(s).", applied);
        applied
    }
}

impl PatternSource for PatternRegistry {
    fn pattern(&self, kind: PatternKind) -> String {
        self.get_pattern(kind)
    }
}

/// Reads the active pattern for `kind` from the global registry.
pub fn get_pattern(kind: PatternKind) -> String {
    PatternRegistry::global().get_pattern(kind)
}

/// Replaces the active pattern for `kind` in the global registry.
pub fn set_pattern(kind: PatternKind, pattern: impl Into<String>) {
    PatternRegistry::global().set_pattern(kind, pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_EMAIL_PATTERN, DEFAULT_IP_PATTERN, DEFAULT_URL_PATTERN};

    #[test]
    fn test_new_registry_holds_defaults() {
        let registry = PatternRegistry::new();
        assert_eq!(registry.get_pattern(PatternKind::Email), DEFAULT_EMAIL_PATTERN);
        assert_eq!(registry.get_pattern(PatternKind::Ip), DEFAULT_IP_PATTERN);
        assert_eq!(registry.get_pattern(PatternKind::Url), DEFAULT_URL_PATTERN);
    }

    #[test]
    fn test_set_pattern_accepts_invalid_regex() {
        let registry = PatternRegistry::new();
        registry.set_pattern(PatternKind::Url, "([");
        assert_eq!(registry.get_pattern(PatternKind::Url), "([");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let registry = PatternRegistry::new();
        let before = registry.snapshot();
        registry.set_pattern(PatternKind::Ip, "changed");
        assert_eq!(before.get(PatternKind::Ip), DEFAULT_IP_PATTERN);
        assert_eq!(registry.get_pattern(PatternKind::Ip), "changed");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let registry = PatternRegistry::new();
        registry.set_pattern(PatternKind::Email, "x");
        registry.reset();
        assert_eq!(registry.snapshot(), PatternSet::default());
    }

    #[test]
    fn test_apply_config_counts_overrides() {
        let registry = PatternRegistry::new();
        let config = PatternConfig {
            email: Some("e".to_string()),
            ip: Some("i".to_string()),
            url: None,
        };
        assert_eq!(registry.apply_config(&config), 2);
        assert_eq!(registry.get_pattern(PatternKind::Email), "e");
        assert_eq!(registry.get_pattern(PatternKind::Ip), "i");
        assert_eq!(registry.get_pattern(PatternKind::Url), DEFAULT_URL_PATTERN);
    }
}
