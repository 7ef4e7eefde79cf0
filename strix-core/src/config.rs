//! Configuration management for `strix-core`.
//!
//! This module defines the pattern kinds the registry understands, the built-in
//! default patterns, and the YAML override format. It handles loading override
//! files, validating that every supplied pattern compiles, and merging layered
//! configurations.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::patterns::compiler::get_or_compile_pattern;

/// Built-in email pattern.
///
/// Local part: word characters plus ``!#$%&'*+/=?^_`{|}~-``, with single
/// internal dots. Domain: labels ending in a 2-4 letter top-level label, or a
/// dotted-decimal literal. `\z` rejects trailing newlines.
pub const DEFAULT_EMAIL_PATTERN: &str = concat!(
    r"^[\w!#$%&'*+/=?^_`{|}~-]+(\.[\w!#$%&'*+/=?^_`{|}~-]+)*",
    "@",
    r"((([\w-]+\.)+[a-zA-Z]{2,4})|(([0-9]{1,3}\.){3}[0-9]{1,3}))\z",
);

/// Built-in IPv4 pattern. Unanchored; each octet is limited to 0-255 by alternation.
pub const DEFAULT_IP_PATTERN: &str = concat!(
    r"\b(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.",
    r"(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.",
    r"(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.",
    r"(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b",
);

/// Built-in URL pattern.
pub const DEFAULT_URL_PATTERN: &str = concat!(
    r"(file|gopher|news|nntp|telnet|http|ftp|https|ftps|sftp)://",
    r"?(([0-9a-z_!~*'().&=+$%-]+: )?[0-9a-z_!~*'().&=+$%-]+@)?", // user@
    r"(([0-9]{1,3}\.){3}[0-9]{1,3}",                              // IPv4 host
    r"|",
    r"([0-9a-z_!~*'()-]+\.)*",                                    // tertiary labels, e.g. www.
    r"([0-9a-z][0-9a-z-]{0,61})?[0-9a-z]",                        // second-level label
    r"(\.[a-z]{2,6})?)",                                          // optional top-level label
    r"(:[0-9]{1,5})?",                                            // port
    r"((/?)|(/[0-9a-z_!~*'().;?:@&=+$,%#-]+)+/?)$",
);

/// The validation categories backed by a configurable pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Email,
    Ip,
    Url,
}

impl PatternKind {
    /// Every kind, in registry order.
    pub const ALL: [PatternKind; 3] = [PatternKind::Email, PatternKind::Ip, PatternKind::Url];

    /// The built-in pattern for this kind.
    pub fn default_pattern(self) -> &'static str {
        match self {
            PatternKind::Email => DEFAULT_EMAIL_PATTERN,
            PatternKind::Ip => DEFAULT_IP_PATTERN,
            PatternKind::Url => DEFAULT_URL_PATTERN,
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PatternKind::Email => "email",
            PatternKind::Ip => "IP",
            PatternKind::Url => "URL",
        };
        f.write_str(name)
    }
}

/// One active pattern per kind.
///
/// This is both the registry's storage and the value handed out by
/// [`PatternRegistry::snapshot`](crate::PatternRegistry::snapshot).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternSet {
    pub email: String,
    pub ip: String,
    pub url: String,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL_PATTERN.to_string(),
            ip: DEFAULT_IP_PATTERN.to_string(),
            url: DEFAULT_URL_PATTERN.to_string(),
        }
    }
}

impl PatternSet {
    pub fn get(&self, kind: PatternKind) -> &str {
        match kind {
            PatternKind::Email => &self.email,
            PatternKind::Ip => &self.ip,
            PatternKind::Url => &self.url,
        }
    }

    pub fn set(&mut self, kind: PatternKind, pattern: String) {
        match kind {
            PatternKind::Email => self.email = pattern,
            PatternKind::Ip => self.ip = pattern,
            PatternKind::Url => self.url = pattern,
        }
    }
}

/// Pattern overrides, as read from a YAML file.
///
/// ```yaml
/// email: '^[a-z]+@example\.com\z'
/// ip: '\b10\.\d{1,3}\.\d{1,3}\.\d{1,3}\b'
/// ```
///
/// Absent keys leave the corresponding pattern untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternConfig {
    pub email: Option<String>,
    pub ip: Option<String>,
    pub url: Option<String>,
}

impl PatternConfig {
    /// Returns the override for `kind`, if any.
    pub fn get(&self, kind: PatternKind) -> Option<&str> {
        match kind {
            PatternKind::Email => self.email.as_deref(),
            PatternKind::Ip => self.ip.as_deref(),
            PatternKind::Url => self.url.as_deref(),
        }
    }

    /// Iterates the overrides that are present.
    pub fn overrides(&self) -> impl Iterator<Item = (PatternKind, &str)> + '_ {
        PatternKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|pattern| (kind, pattern)))
    }

    /// Parses and validates overrides from a YAML string.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: PatternConfig =
            serde_yml::from_str(text).context("Failed to parse pattern configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads pattern overrides from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading pattern overrides from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: PatternConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        info!(
            "Loaded {} pattern override(s) from file {}.",
            config.overrides().count(),
            path.display()
        );
        Ok(config)
    }

    /// The per-user override file: `<config dir>/strix/patterns.yaml`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("strix").join("patterns.yaml"))
    }

    /// Loads the per-user override file if it exists.
    pub fn load_user_config() -> Result<Option<Self>> {
        match Self::default_config_path() {
            Some(path) if path.is_file() => Self::load_from_file(&path).map(Some),
            Some(path) => {
                debug!("No user pattern file at {}.", path.display());
                Ok(None)
            }
            None => {
                debug!("No configuration directory on this platform; skipping user patterns.");
                Ok(None)
            }
        }
    }

    /// Checks that every present override is non-empty and compiles.
    ///
    /// All problems are collected into a single error report.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        for (kind, pattern) in self.overrides() {
            if pattern.is_empty() {
                errors.push(format!("The {} pattern is empty.", kind));
                continue;
            }
            if let Err(e) = get_or_compile_pattern(pattern) {
                errors.push(format!("The {} pattern is not a valid regex: {}", kind, e));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Pattern validation failed:\n{}", errors.join("\n")))
        }
    }
}

/// Overlays `overlay` onto `base`: every override present in `overlay` wins.
pub fn merge_configs(base: PatternConfig, overlay: Option<PatternConfig>) -> PatternConfig {
    let Some(overlay) = overlay else {
        return base;
    };

    debug!(
        "Merging {} override(s) onto {} base override(s).",
        overlay.overrides().count(),
        base.overrides().count()
    );

    PatternConfig {
        email: overlay.email.or(base.email),
        ip: overlay.ip.or(base.ip),
        url: overlay.url.or(base.url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns_compile() {
        for kind in PatternKind::ALL {
            assert!(
                get_or_compile_pattern(kind.default_pattern()).is_ok(),
                "default {} pattern failed to compile",
                kind
            );
        }
    }

    #[test]
    fn test_pattern_set_get_set() {
        let mut set = PatternSet::default();
        assert_eq!(set.get(PatternKind::Ip), DEFAULT_IP_PATTERN);
        set.set(PatternKind::Ip, "custom".to_string());
        assert_eq!(set.get(PatternKind::Ip), "custom");
        assert_eq!(set.get(PatternKind::Email), DEFAULT_EMAIL_PATTERN);
    }

    #[test]
    fn test_overrides_only_lists_present_kinds() {
        let config = PatternConfig {
            url: Some("x".to_string()),
            ..Default::default()
        };
        let kinds: Vec<PatternKind> = config.overrides().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![PatternKind::Url]);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(PatternKind::Email.to_string(), "email");
        assert_eq!(PatternKind::Ip.to_string(), "IP");
        assert_eq!(PatternKind::Url.to_string(), "URL");
    }
}
