//! Blocking Helix API facade: the GET/POST primitives plus one method per
//! endpoint.
//!
//! Methods that return `Option<Value>` unwrap the envelope's `data` field;
//! methods that return `Value` hand back the whole envelope, `errors`
//! included.

use chrono::Local;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::HelixClient;
use crate::dates::TransactionWindow;
use crate::error::{ConfigError, HelixError};
use crate::http::HttpRequest;
use crate::transport::{Transport, TransportOptions, UreqTransport};
use crate::types::{unwrap_data, ApiCredentials};

/// Helix API client. Holds no per-call state, so one instance can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct Helix<T = UreqTransport> {
    client: HelixClient,
    transport: T,
}

impl Helix<UreqTransport> {
    /// Client over the default `ureq` transport.
    pub fn new(credentials: ApiCredentials) -> Self {
        Self::with_transport(credentials, UreqTransport::default())
    }

    /// Validates `credentials` and builds a `ureq` transport from `options`.
    pub fn try_new(credentials: ApiCredentials, options: TransportOptions) -> Result<Self, ConfigError> {
        credentials.validate()?;
        Ok(Self::with_transport(credentials, UreqTransport::new(options)))
    }
}

impl<T: Transport> Helix<T> {
    pub fn with_transport(credentials: ApiCredentials, transport: T) -> Self {
        Self {
            client: HelixClient::new(credentials),
            transport,
        }
    }

    pub fn client(&self) -> &HelixClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // -----------------------------------------------------------------------
    // Primitives
    // -----------------------------------------------------------------------

    pub fn get(&self, path: &str) -> Result<Value, HelixError> {
        let request = self.client.build_get(path);
        self.send(request)
    }

    pub fn post(&self, path: &str, body: &Value) -> Result<Value, HelixError> {
        let request = self.client.build_post(path, body)?;
        self.send(request)
    }

    fn send(&self, request: HttpRequest) -> Result<Value, HelixError> {
        debug!(method = %request.method, url = %request.url, "helix request");
        let result = self
            .transport
            .execute(&request)
            .map_err(HelixError::from)
            .and_then(|response| self.client.parse_response(response));
        if let Err(err) = &result {
            warn!(
                method = %request.method,
                url = %request.url,
                kind = ?err.kind(),
                data = %err.data(),
                "helix request failed"
            );
        }
        result
    }

    fn culture<'a>(&'a self, culture: Option<&'a str>) -> &'a str {
        culture.unwrap_or_else(|| self.client.default_locale())
    }

    // -----------------------------------------------------------------------
    // Program
    // -----------------------------------------------------------------------

    /// Raw program envelope.
    pub fn get_program(&self) -> Result<Value, HelixError> {
        self.get("program/get")
    }

    pub fn program(&self) -> Result<Option<Value>, HelixError> {
        self.get("program/get").map(unwrap_data)
    }

    pub fn list_due_diligence_questions(&self) -> Result<Option<Value>, HelixError> {
        self.get("program/questionsList").map(unwrap_data)
    }

    // -----------------------------------------------------------------------
    // Bank documents
    // -----------------------------------------------------------------------

    /// Lists bank documents for `culture`, or the default locale.
    pub fn list_bank_documents(&self, culture: Option<&str>) -> Result<Option<Value>, HelixError> {
        let culture = self.culture(culture);
        self.get(&format!("bankDocument/list/{culture}"))
            .map(unwrap_data)
    }

    pub fn download_bank_document(
        &self,
        document_id: i64,
        culture: Option<&str>,
    ) -> Result<Value, HelixError> {
        let culture = self.culture(culture);
        self.get(&format!("bankDocument/download/{culture}/{document_id}"))
    }

    // -----------------------------------------------------------------------
    // Customers and due diligence
    // -----------------------------------------------------------------------

    pub fn list_due_diligence_responses(&self, customer_id: i64) -> Result<Option<Value>, HelixError> {
        self.get(&format!("customer/answerList/{customer_id}"))
            .map(unwrap_data)
    }

    /// Same endpoint as `list_due_diligence_responses`, without unwrapping.
    pub fn list_customer_due_diligence_responses(&self, customer_id: i64) -> Result<Value, HelixError> {
        self.get(&format!("customer/answerList/{customer_id}"))
    }

    pub fn due_diligence_answer(&self, data: &Value) -> Result<Value, HelixError> {
        self.post("customer/answerPost", data)
    }

    pub fn create_customer(&self, data: &Value) -> Result<Value, HelixError> {
        self.post("customer/create", data)
    }

    pub fn create_business_customer(&self, data: &Value) -> Result<Value, HelixError> {
        self.post("customer/createBusiness", data)
    }

    pub fn create_application(&self, data: &Value) -> Result<Value, HelixError> {
        self.post("customer/createBusinessApplication", data)
    }

    // -----------------------------------------------------------------------
    // Accounts and transactions
    // -----------------------------------------------------------------------

    pub fn create_account(&self, data: &Value) -> Result<Value, HelixError> {
        self.post("account/create", data)
    }

    pub fn get_account(&self, customer_id: i64, account_id: i64) -> Result<Option<Value>, HelixError> {
        self.get(&format!("account/get/{customer_id}/{account_id}"))
            .map(unwrap_data)
    }

    /// Transactions between `begin` and `end`. A missing `begin` defaults to
    /// 30 days ago (`YYYY-MM-DD`); a missing `end` defaults to today in the
    /// API's legacy `YYYY--MM-DD` form.
    pub fn transactions(
        &self,
        customer_id: i64,
        account_id: i64,
        begin: Option<&str>,
        end: Option<&str>,
    ) -> Result<Option<Value>, HelixError> {
        let window = TransactionWindow::resolve(begin, end, Local::now().date_naive());
        self.get(&format!(
            "transaction/list/{customer_id}/{account_id}/{}/{}",
            window.begin, window.end
        ))
        .map(unwrap_data)
    }

    // -----------------------------------------------------------------------
    // External accounts
    // -----------------------------------------------------------------------

    pub fn create_external_account(&self, data: &Value) -> Result<Value, HelixError> {
        self.post("externalAccount/create", data)
    }

    pub fn initiate_external_account(&self, data: &Value) -> Result<Value, HelixError> {
        self.post("externalAccount/initiate", data)
    }

    pub fn verify_external_account(&self, data: &Value) -> Result<Value, HelixError> {
        self.post("externalAccount/verify", data)
    }

    pub fn get_external_account(
        &self,
        customer_id: i64,
        external_account_id: i64,
    ) -> Result<Option<Value>, HelixError> {
        self.get(&format!("externalAccount/get/{customer_id}/{external_account_id}"))
            .map(unwrap_data)
    }
}
