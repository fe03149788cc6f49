//! Credentials and envelope helpers for the Helix API.
//!
//! # Design
//! Request payloads and the `data` field are untyped JSON on the wire, so
//! they stay `serde_json::Value` here. The only structure the client relies
//! on is the envelope convention `{ "errors": ..., "data": ... }`.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::ConfigError;

/// Connection settings for one client. Immutable once built.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ApiCredentials {
    pub base_url: String,
    pub key: String,
    pub secret: String,
    pub default_locale: String,
}

impl ApiCredentials {
    pub fn new(
        base_url: impl Into<String>,
        key: impl Into<String>,
        secret: impl Into<String>,
        default_locale: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            key: key.into(),
            secret: secret.into(),
            default_locale: default_locale.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(self.base_url.clone()));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingHost(self.base_url.clone()));
        }
        Ok(())
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("base_url", &self.base_url)
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("default_locale", &self.default_locale)
            .finish()
    }
}

/// Loose truthiness used for the `errors` field: null, false, zero, `""`,
/// `"0"`, and empty arrays or objects are all "no errors".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// The envelope's `errors` field, if it signals a failure.
pub fn reported_errors(envelope: &Value) -> Option<&Value> {
    envelope.get("errors").filter(|errors| is_truthy(errors))
}

/// Take `data` out of an envelope. Absent or null `data` yields `None`.
pub fn unwrap_data(mut envelope: Value) -> Option<Value> {
    match envelope.get_mut("data").map(Value::take) {
        Some(Value::Null) | None => None,
        Some(data) => Some(data),
    }
}
