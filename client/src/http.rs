use reqwest::Client;
use serde_json::Value;
use shared::identity::Identity;
use shared::submission::{build_submission_form, FormFields};
use tracing::{debug, warn};

use crate::config::Config;
use crate::duplicate_guard::PhoneLookup;
use crate::error::TransportError;
use crate::submission_client::SubmissionRelay;

/// `GET <url>?phone=<digits>` against the lookup script.
pub struct HttpPhoneLookup {
    client: Client,
    url: String,
}

impl HttpPhoneLookup {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(client, config.lookup_url.clone())
    }
}

impl PhoneLookup for HttpPhoneLookup {
    async fn exists(&self, phone: &str) -> Result<bool, TransportError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("phone", phone)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }
        let body = response.text().await?;
        debug!("Lookup response body: {}", body);
        parse_lookup_body(&body)
    }
}

/// Reads `{"exists": bool}`. The script reports its own failures as
/// `{"exists": false, "error": "..."}`, which is not a real "no".
pub fn parse_lookup_body(body: &str) -> Result<bool, TransportError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| TransportError::Malformed(format!("lookup body is not JSON: {}", e)))?;

    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        let detail = error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string());
        return Err(TransportError::Remote(detail));
    }

    match value.get("exists") {
        Some(Value::Bool(exists)) => Ok(*exists),
        Some(other) => Err(TransportError::Malformed(format!(
            "`exists` is not a boolean: {}",
            other
        ))),
        None => Err(TransportError::Malformed("missing `exists` field".to_string())),
    }
}

/// Posts the entry as a url-encoded form. The relay never answers with
/// anything we can parse, so only the status line is looked at.
pub struct HttpRelay {
    client: Client,
    url: String,
    fields: FormFields,
}

impl HttpRelay {
    pub fn new(client: Client, url: impl Into<String>, fields: FormFields) -> Self {
        Self {
            client,
            url: url.into(),
            fields,
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(client, config.relay_url.clone(), config.form_fields.clone())
    }
}

impl SubmissionRelay for HttpRelay {
    async fn dispatch(&self, identity: &Identity, prize: &str) -> Result<(), TransportError> {
        let form = build_submission_form(identity, prize, &self.fields);
        let response = self.client.post(&self.url).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Relay answered {} for a submission", status);
            return Err(TransportError::Status(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup_body() {
        assert!(parse_lookup_body(r#"{"exists": true}"#).unwrap());
        assert!(!parse_lookup_body(r#"{"exists": false}"#).unwrap());
        assert!(!parse_lookup_body(r#"{"exists": false, "error": null}"#).unwrap());
    }

    #[test]
    fn test_parse_lookup_body_failures() {
        assert!(matches!(
            parse_lookup_body(r#"{"exists": false, "error": "No phone number provided"}"#),
            Err(TransportError::Remote(msg)) if msg == "No phone number provided"
        ));
        assert!(matches!(parse_lookup_body(r#"{"exists": "yes"}"#), Err(TransportError::Malformed(_))));
        assert!(matches!(parse_lookup_body(r#"{"found": true}"#), Err(TransportError::Malformed(_))));
        assert!(matches!(parse_lookup_body("<html>Moved</html>"), Err(TransportError::Malformed(_))));
    }
}
