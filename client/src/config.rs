use std::{fmt, time::Duration};

use shared::constants::*;
use shared::submission::FormFields;
use shared::wheel::SPIN_DURATION_MS;
use tracing::warn;

use crate::transport::RetryPolicy;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "{} must be set", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub lookup_url: String,
    pub relay_url: String,
    pub request_timeout: Duration,
    pub spin_duration: Duration,
    pub form_fields: FormFields,
}

impl Config {
    /// Reads settings from the process environment. Call `dotenvy::dotenv()`
    /// first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let lookup_url = get("SPIN_LOOKUP_URL").ok_or(ConfigError::Missing("SPIN_LOOKUP_URL"))?;
        let relay_url = get("SPIN_RELAY_URL").unwrap_or_else(|| DEFAULT_RELAY_URL.to_string());

        let request_timeout = Duration::from_millis(parse_or(
            "SPIN_REQUEST_TIMEOUT_MS",
            get("SPIN_REQUEST_TIMEOUT_MS"),
            DEFAULT_REQUEST_TIMEOUT_MS,
        ));
        let spin_duration = Duration::from_millis(parse_or(
            "SPIN_DURATION_MS",
            get("SPIN_DURATION_MS"),
            SPIN_DURATION_MS,
        ));

        let defaults = FormFields::default();
        let form_fields = FormFields {
            name: get("SPIN_FIELD_NAME").unwrap_or(defaults.name),
            phone: get("SPIN_FIELD_PHONE").unwrap_or(defaults.phone),
            email: get("SPIN_FIELD_EMAIL").unwrap_or(defaults.email),
            prize: get("SPIN_FIELD_PRIZE").unwrap_or(defaults.prize),
            city: get("SPIN_FIELD_CITY").or(defaults.city),
            store: get("SPIN_FIELD_STORE").or(defaults.store),
        };

        Ok(Self {
            lookup_url,
            relay_url,
            request_timeout,
            spin_duration,
            form_fields,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.request_timeout)
    }

    /// Request deadlines come from `retry_policy`, so the client itself has
    /// no timeout.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder().build()
    }
}

/// Millisecond settings must be a positive number; anything else falls back
/// to the default.
fn parse_or(key: &str, raw: Option<String>, default: u64) -> u64 {
    let raw = match raw {
        None => return default,
        Some(raw) => raw,
    };
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => value,
        _ => {
            warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_lookup_url_is_required() {
        assert!(matches!(config_from(&[]), Err(ConfigError::Missing("SPIN_LOOKUP_URL"))));
        assert!(config_from(&[("SPIN_LOOKUP_URL", "  ")]).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("SPIN_LOOKUP_URL", "http://lookup")]).unwrap();
        assert_eq!(config.relay_url, DEFAULT_RELAY_URL);
        assert_eq!(config.request_timeout, Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS));
        assert_eq!(config.spin_duration, Duration::from_millis(3000));
        assert_eq!(config.form_fields, FormFields::default());
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let config = config_from(&[
            ("SPIN_LOOKUP_URL", "http://lookup"),
            ("SPIN_RELAY_URL", "http://relay"),
            ("SPIN_REQUEST_TIMEOUT_MS", "2500"),
            ("SPIN_DURATION_MS", "soon"),
            ("SPIN_FIELD_PRIZE", "entry.42"),
        ])
        .unwrap();
        assert_eq!(config.relay_url, "http://relay");
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.spin_duration, Duration::from_millis(3000));
        assert_eq!(config.form_fields.prize, "entry.42");
        assert_eq!(config.form_fields.name, NAME_FIELD);
    }

    #[test]
    fn test_zero_millis_falls_back_to_default() {
        let config = config_from(&[
            ("SPIN_LOOKUP_URL", "http://lookup"),
            ("SPIN_REQUEST_TIMEOUT_MS", "0"),
            ("SPIN_DURATION_MS", "0"),
        ])
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS));
        assert_eq!(config.spin_duration, Duration::from_millis(SPIN_DURATION_MS));
    }

    #[test]
    fn test_location_fields_only_when_configured() {
        let config = config_from(&[("SPIN_LOOKUP_URL", "http://lookup")]).unwrap();
        assert_eq!(config.form_fields.city, None);
        assert_eq!(config.form_fields.store, None);

        let config = config_from(&[
            ("SPIN_LOOKUP_URL", "http://lookup"),
            ("SPIN_FIELD_CITY", "entry.11"),
            ("SPIN_FIELD_STORE", "entry.12"),
        ])
        .unwrap();
        assert_eq!(config.form_fields.city.as_deref(), Some("entry.11"));
        assert_eq!(config.form_fields.store.as_deref(), Some("entry.12"));
    }
}
