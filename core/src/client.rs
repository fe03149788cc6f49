//! Stateless HTTP request builder and response parser for the Helix API.
//!
//! # Design
//! `HelixClient` holds only the credentials and carries no mutable state
//! between calls. Each primitive is split into a `build_*` method that
//! produces an `HttpRequest` and `parse_response`, which consumes the
//! `HttpResponse`. Executing the round trip is left to a `Transport`.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;

use crate::error::HelixError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{reported_errors, ApiCredentials};

/// Synchronous, stateless request builder for the Helix API.
#[derive(Clone)]
pub struct HelixClient {
    credentials: ApiCredentials,
    base_url: String,
    authorization: String,
}

impl fmt::Debug for HelixClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelixClient")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HelixClient {
    pub fn new(credentials: ApiCredentials) -> Self {
        let base_url = credentials.base_url.trim_end_matches('/').to_string();
        let token = STANDARD.encode(format!("{}:{}", credentials.key, credentials.secret));
        Self {
            credentials,
            base_url,
            authorization: format!("Basic {token}"),
        }
    }

    pub fn credentials(&self) -> &ApiCredentials {
        &self.credentials
    }

    pub fn default_locale(&self) -> &str {
        &self.credentials.default_locale
    }

    /// Absolute URL for an endpoint path, joined with a single `/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn build_get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(path),
            headers: vec![("authorization".to_string(), self.authorization.clone())],
            body: None,
        }
    }

    pub fn build_post(&self, path: &str, body: &Value) -> Result<HttpRequest, HelixError> {
        let body = serde_json::to_string(body).map_err(HelixError::transport)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url(path),
            headers: vec![
                ("authorization".to_string(), self.authorization.clone()),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }

    /// Decode a response into the raw envelope or the normalized error.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, HelixError> {
        match response.status {
            200..=299 => {
                let envelope: Value =
                    serde_json::from_str(&response.body).map_err(HelixError::transport)?;
                if let Some(errors) = reported_errors(&envelope) {
                    return Err(HelixError::business(errors.clone()));
                }
                Ok(envelope)
            }
            400..=499 => {
                let body = serde_json::from_str(&response.body)
                    .unwrap_or(Value::String(response.body));
                Err(HelixError::client_request(response.status, body))
            }
            status => Err(HelixError::transport(format!(
                "HTTP {status}: {}",
                response.body
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    fn client() -> HelixClient {
        HelixClient::new(ApiCredentials::new(
            "https://helix.test/api",
            "key",
            "secret",
            "en-US",
        ))
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse::new(200, body)
    }

    #[test]
    fn build_get_produces_correct_request() {
        let req = client().build_get("account/get/5/9");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://helix.test/api/account/get/5/9");
        assert!(req.body.is_none());
        // base64("key:secret")
        assert_eq!(req.header("Authorization"), Some("Basic a2V5OnNlY3JldA=="));
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn build_post_produces_correct_request() {
        let req = client()
            .build_post("customer/create", &json!({"firstName": "Ada"}))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://helix.test/api/customer/create");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("authorization"), Some("Basic a2V5OnNlY3JldA=="));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"firstName": "Ada"}));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = HelixClient::new(ApiCredentials::new("http://localhost:3000/", "k", "s", "en-US"));
        assert_eq!(client.build_get("program/get").url, "http://localhost:3000/program/get");
        assert_eq!(client.url("/program/get"), "http://localhost:3000/program/get");
    }

    #[test]
    fn parse_success_returns_whole_envelope() {
        let envelope = client()
            .parse_response(ok(r#"{"data":{"foo":1},"errors":[]}"#))
            .unwrap();
        assert_eq!(envelope, json!({"data": {"foo": 1}, "errors": []}));
    }

    #[test]
    fn parse_success_without_errors_key() {
        let envelope = client().parse_response(ok(r#"{"data":[1,2]}"#)).unwrap();
        assert_eq!(envelope["data"], json!([1, 2]));
    }

    #[test]
    fn parse_business_errors() {
        let err = client()
            .parse_response(ok(r#"{"errors":["bad input"]}"#))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Business);
        assert_eq!(err.data(), &json!(["bad input"]));
    }

    #[test]
    fn parse_client_error_with_json_body() {
        let err = client()
            .parse_response(HttpResponse::new(404, r#"{"reason":"not found"}"#))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ClientRequest { status: 404 });
        assert_eq!(err.data(), &json!({"reason": "not found"}));
    }

    #[test]
    fn parse_client_error_with_text_body() {
        let err = client()
            .parse_response(HttpResponse::new(401, "Unauthorized"))
            .unwrap_err();
        assert_eq!(err.data(), &json!("Unauthorized"));
    }

    #[test]
    fn parse_server_error_is_transport() {
        let err = client()
            .parse_response(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.data(), &json!({"message": "HTTP 500: internal error"}));
    }

    #[test]
    fn parse_bad_json_is_transport() {
        let err = client().parse_response(ok("not json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.data()["message"].is_string());
    }
}
