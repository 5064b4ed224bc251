//! YAML-backed translator settings with environment variable substitution.

use dotenvy::dotenv;
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

use crate::translator::Strategy;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Translator configuration, typically loaded from a YAML document:
///
/// ```yaml
/// default_language: ${GLOSSA_DEFAULT_LANG:en}
/// strategy: independent
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_language: String,
    pub strategy: Strategy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_language: "en".to_owned(),
            strategy: Strategy::Independent,
        }
    }
}

/// Replace `${VAR}` / `${VAR:default}` placeholders with environment values.
fn replace_vars(content: &str) -> String {
    // Missing .env files are fine (production usually has none).
    let _ = dotenv();

    static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = VAR_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([A-Z0-9_]+)(?::([^\}]*))?\}").expect("Invalid regex pattern")
    });

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str());

        match env::var(var_name) {
            Ok(val) => val,
            Err(_) => default.unwrap_or("").to_string(),
        }
    })
    .into_owned()
}

impl Settings {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Result<Self, SettingsError> {
        let replaced = replace_vars(content);
        let settings = serde_yaml::from_str(&replaced)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_vars_basic() {
        unsafe {
            env::set_var("GLOSSA_TEST_VAR_BASIC", "fr");
        }
        let output = replace_vars("default_language: ${GLOSSA_TEST_VAR_BASIC}");
        assert_eq!(output, "default_language: fr");
    }

    #[test]
    fn test_replace_vars_default() {
        let output = replace_vars("default_language: ${GLOSSA_TEST_VAR_MISSING:de}");
        assert_eq!(output, "default_language: de");
    }

    #[test]
    fn test_replace_vars_no_default() {
        let output = replace_vars("default_language: ${GLOSSA_TEST_VAR_MISSING_NO_DEFAULT}");
        assert_eq!(output, "default_language: ");
    }

    #[test]
    fn test_load_from_str() {
        unsafe {
            env::set_var("GLOSSA_TEST_LANG", "ru");
        }
        let yaml = r#"
        default_language: ${GLOSSA_TEST_LANG}
        strategy: unified
        "#;

        let settings = Settings::load_from_str(yaml).unwrap();
        assert_eq!(settings.default_language, "ru");
        assert_eq!(settings.strategy, Strategy::Unified);
    }

    #[test]
    fn test_load_defaults_when_omitted() {
        let settings = Settings::load_from_str("{}").unwrap();
        assert_eq!(settings.default_language, "en");
        assert_eq!(settings.strategy, Strategy::Independent);
    }

    #[test]
    fn test_strategy_names() {
        let independent: Settings =
            Settings::load_from_str("strategy: independent").unwrap();
        assert_eq!(independent.strategy, Strategy::Independent);

        assert!(Settings::load_from_str("strategy: sideways").is_err());
    }
}
