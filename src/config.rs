//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Key the form record is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "paymentpro-signup";

/// Signup wizard configuration.
#[derive(Debug, Clone)]
pub struct SignupConfig {
    /// Database file for the persisted form. `None` keeps the form in memory.
    pub db_path: Option<PathBuf>,
    /// Key the form record is stored under.
    pub storage_key: String,
    /// Upper bound on a single submission attempt.
    pub submit_timeout: Duration,
    /// Delay of the simulated submission service.
    pub submit_delay: Duration,
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            submit_timeout: Duration::from_secs(30),
            submit_delay: Duration::from_secs(2),
        }
    }
}

impl SignupConfig {
    /// Build a config from `SIGNUP_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("SIGNUP_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(key) = lookup("SIGNUP_STORAGE_KEY") {
            if key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "SIGNUP_STORAGE_KEY".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            config.storage_key = key;
        }
        if let Some(secs) = lookup("SIGNUP_SUBMIT_TIMEOUT_SECS") {
            let secs = parse_u64("SIGNUP_SUBMIT_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "SIGNUP_SUBMIT_TIMEOUT_SECS".to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
            config.submit_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = lookup("SIGNUP_SUBMIT_DELAY_MS") {
            config.submit_delay = Duration::from_millis(parse_u64("SIGNUP_SUBMIT_DELAY_MS", &ms)?);
        }

        Ok(config)
    }
}

fn parse_u64(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{raw:?} is not a whole number ({e})"),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = SignupConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.db_path.is_none());
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.submit_timeout, Duration::from_secs(30));
        assert_eq!(config.submit_delay, Duration::from_secs(2));
    }

    #[test]
    fn reads_all_overrides() {
        let config = SignupConfig::from_lookup(lookup(&[
            ("SIGNUP_DB_PATH", "/tmp/signup.db"),
            ("SIGNUP_STORAGE_KEY", "other-key"),
            ("SIGNUP_SUBMIT_TIMEOUT_SECS", "5"),
            ("SIGNUP_SUBMIT_DELAY_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/signup.db")));
        assert_eq!(config.storage_key, "other-key");
        assert_eq!(config.submit_timeout, Duration::from_secs(5));
        assert_eq!(config.submit_delay, Duration::from_millis(250));
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = SignupConfig::from_lookup(lookup(&[("SIGNUP_SUBMIT_DELAY_MS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("SIGNUP_SUBMIT_DELAY_MS"));

        let err = SignupConfig::from_lookup(lookup(&[("SIGNUP_SUBMIT_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn rejects_empty_storage_key() {
        assert!(SignupConfig::from_lookup(lookup(&[("SIGNUP_STORAGE_KEY", "  ")])).is_err());
    }
}
