//! JSON envelope a hosting application sends back to its own callers.
//!
//! Successful results and `HelixError`s both render as
//! `{ "status", "message", "data", "code" }`, so a web handler can forward
//! Helix failures without inspecting them.

use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::error::HelixError;

const DEFAULT_SUCCESS_MESSAGE: &str = "successful";

/// HTTP status used when a reported error code is not a usable status.
pub const FALLBACK_ERROR_STATUS: u16 = 400;

/// HTTP status for an error that reported `code`: codes up to 100 become 400.
pub fn status_code_for(code: u16) -> u16 {
    if code <= 100 {
        FALLBACK_ERROR_STATUS
    } else {
        code
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: bool,
    pub message: String,
    pub data: Value,
    pub code: u16,
}

impl ApiResponse {
    /// Status 200 envelope with the default `"successful"` message.
    pub fn successful_default(data: Value) -> Self {
        Self::successful(DEFAULT_SUCCESS_MESSAGE, data)
    }

    /// Status 200 envelope. `message` is kept as given, even when empty.
    pub fn successful(message: &str, data: Value) -> Self {
        Self {
            status: true,
            message: message.to_string(),
            data,
            code: 200,
        }
    }

    /// Failure envelope for `err`. Logs the message/data pair.
    pub fn from_error(err: &HelixError) -> Self {
        error!(data = %err.data(), "{}", err.message());
        Self {
            status: false,
            message: err.message().to_string(),
            data: err.data().clone(),
            code: status_code_for(err.code()),
        }
    }

    /// HTTP status the envelope should be sent with.
    pub fn http_status(&self) -> u16 {
        self.code
    }
}

impl From<HelixError> for ApiResponse {
    fn from(err: HelixError) -> Self {
        ApiResponse::from_error(&err)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn low_codes_fall_back_to_bad_request() {
        assert_eq!(status_code_for(0), 400);
        assert_eq!(status_code_for(100), 400);
        assert_eq!(status_code_for(101), 101);
        assert_eq!(status_code_for(503), 503);
    }

    #[test]
    fn error_envelope_shape() {
        let err = HelixError::business(json!(["bad input"]));
        let response = ApiResponse::from(err);
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(
            body,
            json!({
                "status": false,
                "message": "Helix API Error. ",
                "data": ["bad input"],
                "code": 400
            })
        );
        assert_eq!(response.http_status(), 400);
    }

    #[test]
    fn successful_keeps_explicit_empty_message() {
        let response = ApiResponse::successful("", json!([]));
        assert!(response.status);
        assert_eq!(response.message, "");
    }

    #[test]
    fn successful_envelope_defaults_message() {
        let response = ApiResponse::successful_default(json!({"id": 1}));
        assert!(response.status);
        assert_eq!(response.message, "successful");
        assert_eq!(response.code, 200);
        assert_eq!(response.data, json!({"id": 1}));
    }
}
