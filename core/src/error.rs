//! Error types for the Helix API client.
//!
//! # Design
//! Every failure of a GET/POST round trip collapses into one `HelixError`
//! with the same fixed message. Callers tell failures apart by `data` (and
//! `kind`), never by the message:
//!
//! - `Business`: the API answered 2xx but reported `errors`; `data` is that
//!   field.
//! - `ClientRequest`: the API answered 4xx; `data` is the decoded body, or the
//!   raw body text when it is not JSON.
//! - `Transport`: anything else (network, timeout, 5xx, malformed JSON);
//!   `data` is `{"message": <cause>}`.

use serde_json::{json, Value};
use thiserror::Error;

/// Message carried by every `HelixError`.
pub const HELIX_ERROR_MESSAGE: &str = "Helix API Error. ";

/// Code reported by every `HelixError` (HTTP 400 Bad Request).
pub const HELIX_ERROR_CODE: u16 = 400;

/// Which failure branch produced a `HelixError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Business,
    ClientRequest { status: u16 },
    Transport,
}

/// The normalized error returned by every primitive and domain method.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct HelixError {
    kind: ErrorKind,
    message: String,
    data: Value,
}

impl HelixError {
    fn new(kind: ErrorKind, data: Value) -> Self {
        Self {
            kind,
            message: HELIX_ERROR_MESSAGE.to_string(),
            data,
        }
    }

    /// The API returned 2xx with a truthy `errors` field.
    pub fn business(errors: Value) -> Self {
        Self::new(ErrorKind::Business, errors)
    }

    /// The API returned a 4xx status.
    pub fn client_request(status: u16, body: Value) -> Self {
        Self::new(ErrorKind::ClientRequest { status }, body)
    }

    /// Any other failure, described by its error text.
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::new(ErrorKind::Transport, json!({ "message": cause.to_string() }))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    /// Reported error code, used by the hosting boundary to pick a status.
    pub fn code(&self) -> u16 {
        HELIX_ERROR_CODE
    }
}

/// Failure reported by a `Transport` before any HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<TransportError> for HelixError {
    fn from(err: TransportError) -> Self {
        HelixError::transport(err)
    }
}

/// Invalid `ApiCredentials`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("base URL is empty")]
    EmptyBaseUrl,

    #[error("base URL is not a valid URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("base URL `{0}` must use http or https")]
    UnsupportedScheme(String),

    #[error("base URL `{0}` has no host")]
    MissingHost(String),
}
