//! In-memory stand-in for the Helix API.
//!
//! Serves every endpoint the client wraps, behind HTTP Basic auth, with the
//! same envelope conventions: `{ "data": ..., "errors": [] }` on success,
//! a 200 envelope with non-empty `errors` for rejected input, 404 with
//! `{ "reason": ... }` for unknown resources and 401 for bad credentials.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Local, NaiveDate};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};

pub const SUPPORTED_CULTURES: [&str; 2] = ["en-US", "es-US"];

/// Key/secret pair the mock accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockCredentials {
    pub key: String,
    pub secret: String,
}

impl MockCredentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Expected value of the `authorization` header.
    pub fn basic_header(&self) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", self.key, self.secret)))
    }
}

impl Default for MockCredentials {
    fn default() -> Self {
        Self::new("mock-key", "mock-secret")
    }
}

#[derive(Default)]
struct Store {
    last_id: i64,
    customers: HashMap<i64, Value>,
    answers: HashMap<i64, Vec<Value>>,
    accounts: HashMap<(i64, i64), Value>,
    transactions: HashMap<(i64, i64), Vec<Value>>,
    external_accounts: HashMap<(i64, i64), Value>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn customer_exists(&self, id: i64, errors: &mut Vec<String>) -> bool {
        let exists = self.customers.contains_key(&id);
        if !exists {
            errors.push(format!("customer {id} does not exist"));
        }
        exists
    }
}

#[derive(Clone)]
struct AppState {
    authorization: Arc<str>,
    store: Arc<RwLock<Store>>,
}

pub fn app(credentials: MockCredentials) -> Router {
    let state = AppState {
        authorization: credentials.basic_header().into(),
        store: Arc::new(RwLock::new(Store::default())),
    };
    Router::new()
        .route("/program/get", get(program))
        .route("/program/questionsList", get(questions))
        .route("/bankDocument/list/{culture}", get(list_bank_documents))
        .route("/bankDocument/download/{culture}/{id}", get(download_bank_document))
        .route("/customer/create", post(create_customer))
        .route("/customer/createBusiness", post(create_business_customer))
        .route("/customer/createBusinessApplication", post(create_application))
        .route("/customer/answerPost", post(answer_post))
        .route("/customer/answerList/{id}", get(answer_list))
        .route("/account/create", post(create_account))
        .route("/account/get/{customer_id}/{account_id}", get(get_account))
        .route(
            "/transaction/list/{customer_id}/{account_id}/{begin}/{end}",
            get(list_transactions),
        )
        .route("/externalAccount/create", post(create_external_account))
        .route("/externalAccount/initiate", post(initiate_external_account))
        .route("/externalAccount/verify", post(verify_external_account))
        .route(
            "/externalAccount/get/{customer_id}/{external_account_id}",
            get(get_external_account),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_basic_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener, credentials: MockCredentials) -> Result<(), std::io::Error> {
    axum::serve(listener, app(credentials)).await
}

async fn require_basic_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if presented != Some(&*state.authorization) {
        warn!(path = %request.uri().path(), "rejected request with bad credentials");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "errors": ["invalid credentials"] })),
        )
            .into_response();
    }
    debug!(method = %request.method(), path = %request.uri().path(), "authorized");
    next.run(request).await
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

fn envelope(data: Value) -> Response {
    Json(json!({ "data": data, "errors": [] })).into_response()
}

fn rejected(errors: Vec<String>) -> Response {
    Json(json!({ "data": null, "errors": errors })).into_response()
}

fn not_found(reason: impl Into<String>) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "reason": reason.into() }))).into_response()
}

fn required_str<'a>(body: &'a Value, field: &str, errors: &mut Vec<String>) -> Option<&'a str> {
    let value = body.get(field).and_then(Value::as_str).filter(|s| !s.is_empty());
    if value.is_none() {
        errors.push(format!("{field} is required"));
    }
    value
}

fn required_id(body: &Value, field: &str, errors: &mut Vec<String>) -> Option<i64> {
    let value = body.get(field).and_then(Value::as_i64);
    if value.is_none() {
        errors.push(format!("{field} must be an integer"));
    }
    value
}

fn check_culture(culture: &str) -> Result<(), Response> {
    if SUPPORTED_CULTURES.contains(&culture) {
        Ok(())
    } else {
        Err(rejected(vec![format!("culture {culture} is not supported")]))
    }
}

// ---------------------------------------------------------------------------
// Program and documents
// ---------------------------------------------------------------------------

async fn program() -> Response {
    envelope(json!({
        "programId": 1,
        "name": "Mock Program",
        "bankName": "Mock Bank"
    }))
}

async fn questions() -> Response {
    envelope(json!([
        { "questionId": 1, "text": "What is the source of your funds?" },
        { "questionId": 2, "text": "Do you expect international transfers?" }
    ]))
}

async fn list_bank_documents(Path(culture): Path<String>) -> Response {
    if let Err(response) = check_culture(&culture) {
        return response;
    }
    envelope(json!([
        { "documentId": 1, "name": "Terms and Conditions", "culture": culture },
        { "documentId": 2, "name": "Privacy Notice", "culture": culture }
    ]))
}

async fn download_bank_document(Path((culture, id)): Path<(String, i64)>) -> Response {
    if let Err(response) = check_culture(&culture) {
        return response;
    }
    let name = match id {
        1 => "terms",
        2 => "privacy",
        _ => return not_found(format!("document {id} not found")),
    };
    envelope(json!({
        "documentId": id,
        "culture": culture,
        "fileName": format!("{name}-{culture}.pdf"),
        "content": STANDARD.encode(format!("%PDF mock {name} {culture}")),
    }))
}

// ---------------------------------------------------------------------------
// Customers and due diligence
// ---------------------------------------------------------------------------

async fn create_customer(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let mut errors = Vec::new();
    let first = required_str(&body, "firstName", &mut errors);
    let last = required_str(&body, "lastName", &mut errors);
    let (Some(first), Some(last)) = (first, last) else {
        return rejected(errors);
    };

    let mut store = state.store.write().await;
    let id = store.next_id();
    let customer = json!({
        "customerId": id,
        "customerType": "individual",
        "firstName": first,
        "lastName": last,
    });
    store.customers.insert(id, customer.clone());
    envelope(customer)
}

async fn create_business_customer(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let mut errors = Vec::new();
    let Some(name) = required_str(&body, "businessName", &mut errors) else {
        return rejected(errors);
    };

    let mut store = state.store.write().await;
    let id = store.next_id();
    let customer = json!({
        "customerId": id,
        "customerType": "business",
        "businessName": name,
    });
    store.customers.insert(id, customer.clone());
    envelope(customer)
}

async fn create_application(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let mut errors = Vec::new();
    let Some(customer_id) = required_id(&body, "customerId", &mut errors) else {
        return rejected(errors);
    };

    let mut store = state.store.write().await;
    if !store.customer_exists(customer_id, &mut errors) {
        return rejected(errors);
    }
    let id = store.next_id();
    envelope(json!({
        "applicationId": id,
        "customerId": customer_id,
        "status": "submitted",
    }))
}

async fn answer_post(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let mut errors = Vec::new();
    let customer_id = required_id(&body, "customerId", &mut errors);
    let answers = body.get("answers").and_then(Value::as_array);
    if answers.is_none() {
        errors.push("answers must be a list".to_string());
    }
    let (Some(customer_id), Some(answers)) = (customer_id, answers) else {
        return rejected(errors);
    };

    let mut store = state.store.write().await;
    if !store.customer_exists(customer_id, &mut errors) {
        return rejected(errors);
    }
    let stored = store.answers.entry(customer_id).or_default();
    stored.extend(answers.iter().cloned());
    let count = stored.len();
    envelope(json!({ "customerId": customer_id, "answerCount": count }))
}

async fn answer_list(State(state): State<AppState>, Path(customer_id): Path<i64>) -> Response {
    let store = state.store.read().await;
    if !store.customers.contains_key(&customer_id) {
        return not_found(format!("customer {customer_id} not found"));
    }
    let answers = store.answers.get(&customer_id).cloned().unwrap_or_default();
    envelope(Value::Array(answers))
}

// ---------------------------------------------------------------------------
// Accounts and transactions
// ---------------------------------------------------------------------------

async fn create_account(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let mut errors = Vec::new();
    let Some(customer_id) = required_id(&body, "customerId", &mut errors) else {
        return rejected(errors);
    };
    let deposit = body.get("initialDeposit").and_then(Value::as_f64).unwrap_or(0.0);
    if deposit < 0.0 {
        return rejected(vec!["initialDeposit must not be negative".to_string()]);
    }

    let mut store = state.store.write().await;
    if !store.customer_exists(customer_id, &mut errors) {
        return rejected(errors);
    }
    let account_id = store.next_id();
    let account = json!({
        "accountId": account_id,
        "customerId": customer_id,
        "accountNumber": format!("{account_id:010}"),
        "balance": deposit,
        "status": "open",
    });
    store.accounts.insert((customer_id, account_id), account.clone());

    let mut history = Vec::new();
    if deposit > 0.0 {
        let transaction_id = store.next_id();
        history.push(json!({
            "transactionId": transaction_id,
            "amount": deposit,
            "description": "Initial deposit",
            "date": Local::now().date_naive().format("%Y-%m-%d").to_string(),
        }));
    }
    store.transactions.insert((customer_id, account_id), history);
    envelope(account)
}

async fn get_account(
    State(state): State<AppState>,
    Path((customer_id, account_id)): Path<(i64, i64)>,
) -> Response {
    let store = state.store.read().await;
    match store.accounts.get(&(customer_id, account_id)) {
        Some(account) => envelope(account.clone()),
        None => not_found(format!("account {account_id} not found for customer {customer_id}")),
    }
}

/// Accepts `YYYY-MM-DD`, and the legacy `YYYY--MM-DD` the client sends as its
/// default end date.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y--%m-%d"))
        .ok()
}

async fn list_transactions(
    State(state): State<AppState>,
    Path((customer_id, account_id, begin, end)): Path<(i64, i64, String, String)>,
) -> Response {
    let store = state.store.read().await;
    let Some(history) = store.transactions.get(&(customer_id, account_id)) else {
        return not_found(format!("account {account_id} not found for customer {customer_id}"));
    };

    let mut errors = Vec::new();
    let from = parse_day(&begin);
    if from.is_none() {
        errors.push(format!("beginDate {begin} is not a date"));
    }
    let to = parse_day(&end);
    if to.is_none() {
        errors.push(format!("endDate {end} is not a date"));
    }
    let (Some(from), Some(to)) = (from, to) else {
        return rejected(errors);
    };

    let within: Vec<Value> = history
        .iter()
        .filter(|tx| {
            tx["date"]
                .as_str()
                .and_then(parse_day)
                .is_some_and(|day| day >= from && day <= to)
        })
        .cloned()
        .collect();
    envelope(json!({
        "customerId": customer_id,
        "accountId": account_id,
        "beginDate": begin,
        "endDate": end,
        "transactions": within,
    }))
}

// ---------------------------------------------------------------------------
// External accounts
// ---------------------------------------------------------------------------

async fn create_external_account(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let mut errors = Vec::new();
    let customer_id = required_id(&body, "customerId", &mut errors);
    let routing = required_str(&body, "routingNumber", &mut errors);
    let account_number = required_str(&body, "accountNumber", &mut errors);
    let (Some(customer_id), Some(routing), Some(account_number)) = (customer_id, routing, account_number)
    else {
        return rejected(errors);
    };

    let mut store = state.store.write().await;
    if !store.customer_exists(customer_id, &mut errors) {
        return rejected(errors);
    }
    let id = store.next_id();
    let external = json!({
        "externalAccountId": id,
        "customerId": customer_id,
        "routingNumber": routing,
        "accountNumber": account_number,
        "status": "created",
    });
    store.external_accounts.insert((customer_id, id), external.clone());
    envelope(external)
}

/// Moves an existing external account to `status`, after `check` accepts the
/// request body.
async fn transition_external_account(
    state: AppState,
    body: Value,
    status: &str,
    check: fn(&Value) -> Vec<String>,
) -> Response {
    let mut errors = Vec::new();
    let customer_id = required_id(&body, "customerId", &mut errors);
    let external_id = required_id(&body, "externalAccountId", &mut errors);
    errors.extend(check(&body));
    let (Some(customer_id), Some(external_id), true) = (customer_id, external_id, errors.is_empty())
    else {
        return rejected(errors);
    };

    let mut store = state.store.write().await;
    let Some(external) = store.external_accounts.get_mut(&(customer_id, external_id)) else {
        return rejected(vec![format!(
            "external account {external_id} does not exist for customer {customer_id}"
        )]);
    };
    external["status"] = json!(status);
    envelope(external.clone())
}

async fn initiate_external_account(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    transition_external_account(state, body, "pending", |_| Vec::new()).await
}

async fn verify_external_account(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    transition_external_account(state, body, "verified", |body| {
        let deposits = body
            .get("amounts")
            .and_then(Value::as_array)
            .filter(|amounts| amounts.len() == 2 && amounts.iter().all(Value::is_number));
        match deposits {
            Some(_) => Vec::new(),
            None => vec!["amounts must list the two micro-deposits".to_string()],
        }
    })
    .await
}

async fn get_external_account(
    State(state): State<AppState>,
    Path((customer_id, external_id)): Path<(i64, i64)>,
) -> Response {
    let store = state.store.read().await;
    match store.external_accounts.get(&(customer_id, external_id)) {
        Some(external) => envelope(external.clone()),
        None => not_found(format!(
            "external account {external_id} not found for customer {customer_id}"
        )),
    }
}
