//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - A custom question bank for the risk questionnaire
//! - The validation message shown on unanswered steps
//! - Dashboard currency symbol and fallback sample values
//!
//! Configuration is stored at `~/.config/prudentia/config.toml`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::data_dir;
use crate::dashboard::SampleData;
use crate::error::{BankError, ConfigError};
use crate::quiz::{QuestionBank, QuizEngine, DEFAULT_VALIDATION_MESSAGE};

/// Questionnaire configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// TOML file with a custom question bank; the built-in bank when unset.
    #[serde(default)]
    pub question_bank: Option<PathBuf>,
    #[serde(default = "default_validation_message")]
    pub validation_message: String,
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_fallback_salary")]
    pub fallback_salary: Decimal,
    #[serde(default = "default_fallback_sip_total")]
    pub fallback_sip_total: Decimal,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/prudentia/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub quiz: QuizConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

fn default_validation_message() -> String {
    DEFAULT_VALIDATION_MESSAGE.to_string()
}
fn default_currency_symbol() -> String {
    "₹".into()
}
fn default_fallback_salary() -> Decimal {
    dec!(80000)
}
fn default_fallback_sip_total() -> Decimal {
    dec!(5000)
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_bank: None,
            validation_message: default_validation_message(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            fallback_salary: default_fallback_salary(),
            fallback_sip_total: default_fallback_sip_total(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                // Every leaf is a string or an unset option.
                let new_value = match existing {
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Location of `config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// The configured question bank, or the built-in one.
    pub fn question_bank(&self) -> Result<QuestionBank, BankError> {
        match &self.quiz.question_bank {
            Some(path) => QuestionBank::load(path),
            None => Ok(QuestionBank::default()),
        }
    }

    /// A fresh questionnaire engine using the configured validation message.
    pub fn new_quiz(&self, bank: Arc<QuestionBank>) -> QuizEngine {
        QuizEngine::new(bank).with_validation_message(self.quiz.validation_message.clone())
    }

    /// Dashboard fallbacks with the configured salary and SIP totals.
    pub fn sample_data(&self) -> SampleData {
        SampleData {
            salary: self.dashboard.fallback_salary,
            sip_total: self.dashboard.fallback_sip_total,
            ..SampleData::default()
        }
    }
}
