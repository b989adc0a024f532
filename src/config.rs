//! File-backed report configuration.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use redmine_api::RedmineConfig;

use crate::error::{ReportError, Result};

/// Environment variable that overrides the configured API key, so the
/// credential can stay out of the config file.
pub const API_KEY_ENV: &str = "REDMINE_API_KEY";

/// Default expected workday total, in hours.
fn default_expected_hours() -> Decimal {
    Decimal::from(8)
}

/// Default subject label prefix.
fn default_subject_label() -> String {
    "Daily Report".to_string()
}

/// Default `chrono` format for the date shown in the subject and heading.
fn default_subject_date_format() -> String {
    "%d.%m.%Y".to_string()
}

/// Status names that count as finished for row styling.
fn default_completed_statuses() -> Vec<String> {
    vec![
        "resolved".to_string(),
        "closed".to_string(),
        "deployed".to_string(),
    ]
}

/// Settings for one report run, loaded from a JSON file. Optional fields
/// fall back to defaults; required fields (server, credentials, addresses)
/// are checked by [`ReportConfig::load`] and reported as configuration
/// errors instead of silently defaulting.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub base_url: String,
    pub api_key: String,
    pub user_id: String,
    pub project_filters: Vec<String>,
    pub validate_hours: bool,
    #[serde(default = "default_expected_hours")]
    pub expected_hours: Decimal,
    pub recipients: Vec<String>,
    pub cc: Vec<String>,
    pub operator_email: String,
    #[serde(default = "default_subject_label")]
    pub subject_label: String,
    #[serde(default = "default_subject_date_format")]
    pub subject_date_format: String,
    pub sender_name: Option<String>,
    pub customer_name: Option<String>,
    #[serde(default = "default_completed_statuses")]
    pub completed_statuses: Vec<String>,
    pub signature_html: Option<String>,
    pub signature_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub cooldown_ms: Option<u64>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            user_id: String::new(),
            project_filters: Vec::new(),
            validate_hours: false,
            expected_hours: default_expected_hours(),
            recipients: Vec::new(),
            cc: Vec::new(),
            operator_email: String::new(),
            subject_label: default_subject_label(),
            subject_date_format: default_subject_date_format(),
            sender_name: None,
            customer_name: None,
            completed_statuses: default_completed_statuses(),
            signature_html: None,
            signature_file: None,
            timeout_secs: None,
            cooldown_ms: None,
        }
    }
}

impl ReportConfig {
    /// Platform-specific default config file location.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "redmine-reporter")
            .ok_or_else(|| {
                ReportError::Config("could not determine config directory".to_string())
            })?;
        Ok(dirs.config_dir().join("config.json"))
    }

    /// Loads and checks the configuration, applying the `REDMINE_API_KEY`
    /// environment override when set.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: ReportConfig = serde_json::from_str(&content)
            .map_err(|err| ReportError::Config(format!("{}: {}", path.display(), err)))?;
        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.api_key = key;
            }
        }
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        let missing = |field: &str| {
            Err(ReportError::Config(format!("{} is not set", field)))
        };
        if self.base_url.trim().is_empty() {
            return missing("base_url");
        }
        if self.api_key.trim().is_empty() {
            return missing("api_key");
        }
        if self.user_id.trim().is_empty() {
            return missing("user_id");
        }
        if self.recipients.is_empty() {
            return missing("recipients");
        }
        if self.operator_email.trim().is_empty() {
            return missing("operator_email");
        }
        Ok(())
    }

    /// Client settings derived from this configuration.
    pub fn redmine_config(&self) -> RedmineConfig {
        let mut config = RedmineConfig::new(self.base_url.clone(), self.api_key.clone());
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(millis) = self.cooldown_ms {
            config = config.with_cooldown(Duration::from_millis(millis));
        }
        config
    }

    /// Completed-status names lowered for case-insensitive matching.
    pub fn completed_status_set(&self) -> HashSet<String> {
        self.completed_statuses
            .iter()
            .map(|status| status.trim().to_lowercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ReportConfig;
    use crate::error::ReportError;
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    fn unique_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        env::temp_dir().join(format!("redmine-reporter-tests-{name}-{nanos}/config.json"))
    }

    fn write_config(name: &str, content: &str) -> PathBuf {
        let path = unique_path(name);
        let parent = path.parent().expect("parent must exist");
        fs::create_dir_all(parent).expect("create temp directory");
        fs::write(&path, content).expect("write config");
        path
    }

    const MINIMAL: &str = r#"{
        "base_url": "https://redmine.example.com",
        "api_key": "secret",
        "user_id": "5",
        "recipients": ["client@example.com"],
        "operator_email": "me@example.com"
    }"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let path = write_config("minimal", MINIMAL);
        let config = ReportConfig::load(&path).expect("load should succeed");

        assert_eq!(config.subject_label, "Daily Report");
        assert_eq!(config.subject_date_format, "%d.%m.%Y");
        assert_eq!(config.expected_hours, rust_decimal::Decimal::from(8));
        assert!(!config.validate_hours);
        assert!(config.completed_status_set().contains("resolved"));
        assert!(config.completed_status_set().contains("closed"));
        assert!(config.completed_status_set().contains("deployed"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_recipients_is_a_config_error() {
        let path = write_config(
            "no-recipients",
            r#"{
                "base_url": "https://redmine.example.com",
                "api_key": "secret",
                "user_id": "5",
                "operator_email": "me@example.com"
            }"#,
        );
        let err = ReportConfig::load(&path).unwrap_err();
        assert!(matches!(err, ReportError::Config(message) if message.contains("recipients")));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let path = write_config("invalid", "not-valid-json");
        let err = ReportConfig::load(&path).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = unique_path("missing");
        let err = ReportConfig::load(&path).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }

    #[test]
    fn timeout_and_cooldown_overrides_reach_client_config() {
        let path = write_config(
            "overrides",
            r#"{
                "base_url": "https://redmine.example.com/",
                "api_key": "secret",
                "user_id": "5",
                "recipients": ["client@example.com"],
                "operator_email": "me@example.com",
                "timeout_secs": 5,
                "cooldown_ms": 10
            }"#,
        );
        let config = ReportConfig::load(&path).expect("load should succeed");
        let client_config = config.redmine_config();

        assert_eq!(client_config.timeout, Duration::from_secs(5));
        assert_eq!(client_config.cooldown, Duration::from_millis(10));
        assert_eq!(client_config.api_root(), "https://redmine.example.com/");

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn completed_statuses_match_case_insensitively() {
        let path = write_config(
            "statuses",
            r#"{
                "base_url": "https://redmine.example.com",
                "api_key": "secret",
                "user_id": "5",
                "recipients": ["client@example.com"],
                "operator_email": "me@example.com",
                "completed_statuses": ["Done", "Shipped"]
            }"#,
        );
        let config = ReportConfig::load(&path).expect("load should succeed");
        let set = config.completed_status_set();
        assert!(set.contains("done"));
        assert!(set.contains("shipped"));
        assert!(!set.contains("resolved"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
