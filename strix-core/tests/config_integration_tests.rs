// strix-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use strix_core::config::{self, PatternConfig};
use strix_core::{PatternKind, PatternRegistry, Validator, DEFAULT_EMAIL_PATTERN};

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
ip: '\b10\.\d{1,3}\.\d{1,3}\.\d{1,3}\b'
url: '^https://[a-z.]+$'
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;

    let config = PatternConfig::load_from_file(file.path())?;
    assert_eq!(config.email, None);
    assert_eq!(config.get(PatternKind::Ip), Some(r"\b10\.\d{1,3}\.\d{1,3}\.\d{1,3}\b"));
    assert_eq!(config.overrides().count(), 2);
    Ok(())
}

#[test]
fn test_load_from_file_reports_every_invalid_pattern() -> Result<()> {
    let yaml_content = r#"
email: '(unclosed'
ip: ''
url: '[a-z'
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;

    let err = PatternConfig::load_from_file(file.path()).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("email pattern is not a valid regex"), "{}", message);
    assert!(message.contains("IP pattern is empty"), "{}", message);
    assert!(message.contains("URL pattern is not a valid regex"), "{}", message);
    Ok(())
}

#[test]
fn test_unknown_keys_are_rejected() {
    let result = PatternConfig::from_yaml_str("phone: '\\d+'\n");
    assert!(result.is_err());
}

#[test]
fn test_missing_file_has_context() {
    let err = PatternConfig::load_from_file("/definitely/not/here/patterns.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_merge_configs_overlay_wins() {
    let base = PatternConfig {
        email: Some("base-email".to_string()),
        ip: Some("base-ip".to_string()),
        url: None,
    };
    let overlay = PatternConfig {
        ip: Some("user-ip".to_string()),
        url: Some("user-url".to_string()),
        ..Default::default()
    };

    let merged = config::merge_configs(base.clone(), Some(overlay));
    assert_eq!(merged.email.as_deref(), Some("base-email"));
    assert_eq!(merged.ip.as_deref(), Some("user-ip"));
    assert_eq!(merged.url.as_deref(), Some("user-url"));

    assert_eq!(config::merge_configs(base.clone(), None), base);
}

#[test]
fn test_apply_config_to_registry() -> Result<()> {
    let config = PatternConfig::from_yaml_str("email: '^[a-z]+@example\\.com\\z'\n")?;
    let registry = PatternRegistry::new();
    assert_eq!(registry.apply_config(&config), 1);

    let validator = Validator::new(&registry);
    assert!(validator.is_email("joe@example.com")?);
    assert!(!validator.is_email("joe@home.org")?);

    registry.reset();
    assert_eq!(registry.get_pattern(PatternKind::Email), DEFAULT_EMAIL_PATTERN);
    Ok(())
}

#[test]
fn test_default_config_path_is_under_strix() {
    if let Some(path) = PatternConfig::default_config_path() {
        assert!(path.ends_with("strix/patterns.yaml"));
    }
}
