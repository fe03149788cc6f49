//! Verify request building and response parsing against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use std::sync::Mutex;

use helix_core::{
    ApiCredentials, ErrorKind, Helix, HelixClient, HelixError, HttpMethod, HttpRequest, HttpResponse,
    Transport, TransportError,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn credentials() -> ApiCredentials {
    ApiCredentials::new(BASE_URL, "key", "secret", "en-US")
}

/// Answers every request with an empty success envelope and keeps a copy.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<HttpRequest>>,
}

impl Transport for Recorder {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(HttpResponse::new(200, r#"{"data":{},"errors":[]}"#))
    }
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

/// Invoke the domain method named by a vector, discarding its result.
fn dispatch(helix: &Helix<Recorder>, call: &str, args: &Value) -> Result<(), HelixError> {
    let id = |field: &str| args[field].as_i64().unwrap();
    let text = |field: &str| args[field].as_str();
    let body = &args["body"];
    match call {
        "get_program" => helix.get_program().map(drop),
        "program" => helix.program().map(drop),
        "list_due_diligence_questions" => helix.list_due_diligence_questions().map(drop),
        "list_bank_documents" => helix.list_bank_documents(text("culture")).map(drop),
        "download_bank_document" => helix.download_bank_document(id("id"), text("culture")).map(drop),
        "list_due_diligence_responses" => helix.list_due_diligence_responses(id("id")).map(drop),
        "list_customer_due_diligence_responses" => {
            helix.list_customer_due_diligence_responses(id("id")).map(drop)
        }
        "due_diligence_answer" => helix.due_diligence_answer(body).map(drop),
        "create_customer" => helix.create_customer(body).map(drop),
        "create_business_customer" => helix.create_business_customer(body).map(drop),
        "create_application" => helix.create_application(body).map(drop),
        "create_account" => helix.create_account(body).map(drop),
        "get_account" => helix.get_account(id("customer_id"), id("account_id")).map(drop),
        "transactions" => helix
            .transactions(id("customer_id"), id("account_id"), text("begin"), text("end"))
            .map(drop),
        "create_external_account" => helix.create_external_account(body).map(drop),
        "initiate_external_account" => helix.initiate_external_account(body).map(drop),
        "verify_external_account" => helix.verify_external_account(body).map(drop),
        "get_external_account" => helix
            .get_external_account(id("customer_id"), id("account_id"))
            .map(drop),
        other => panic!("unknown call: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

#[test]
fn route_test_vectors() {
    let raw = include_str!("../../test-vectors/routes.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let helix = Helix::with_transport(credentials(), Recorder::default());
        dispatch(&helix, case["call"].as_str().unwrap(), &case["args"]).unwrap();

        let seen = helix.transport().seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "{name}: exactly one request");
        let req = &seen[0];
        let expected_req = &case["expected_request"];

        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert!(req.header("authorization").is_some(), "{name}: auth header");

        match expected_req.get("body") {
            Some(expected_body) => {
                assert_eq!(req.header("content-type"), Some("application/json"), "{name}: content type");
                let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&req_body, expected_body, "{name}: body");
            }
            None => assert!(req.body.is_none(), "{name}: body should be None"),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let client = HelixClient::new(credentials());
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let response = HttpResponse::new(
            sim["status"].as_u64().unwrap() as u16,
            sim["body"].as_str().unwrap(),
        );
        let result = client.parse_response(response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            let expected_kind = match expected_error["kind"].as_str().unwrap() {
                "Business" => ErrorKind::Business,
                "ClientRequest" => ErrorKind::ClientRequest {
                    status: expected_error["status"].as_u64().unwrap() as u16,
                },
                "Transport" => ErrorKind::Transport,
                other => panic!("{name}: unknown expected kind: {other}"),
            };
            assert_eq!(err.kind(), expected_kind, "{name}: kind");
            assert_eq!(err.message(), "Helix API Error. ", "{name}: message");
            assert_eq!(err.data(), &expected_error["data"], "{name}: data");
        } else {
            let envelope = result.unwrap();
            assert_eq!(envelope, case["expected_result"], "{name}: parsed result");
        }
    }
}
