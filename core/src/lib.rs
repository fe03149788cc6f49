//! Blocking client for the Helix banking API.
//!
//! # Overview
//! Wraps the Helix HTTP API (program, customer, account, transaction and
//! bank-document endpoints) in plain method calls. Every call returns either
//! the decoded response envelope, its `data` field, or a `HelixError` with
//! the fixed message `"Helix API Error. "` and a structured `data` payload.
//!
//! # Design
//! - `HelixClient` is sans-IO: `build_get`/`build_post` produce
//!   `HttpRequest` values, `parse_response` consumes `HttpResponse` values
//!   and applies the error-normalization rules.
//! - `Transport` executes the round trip; `UreqTransport` is the default.
//! - `Helix` composes both and exposes the domain methods.
//! - `ApiResponse` renders results and errors for a hosting application.
//!
//! ```no_run
//! use helix_core::{ApiCredentials, Helix};
//!
//! let helix = Helix::new(ApiCredentials::new(
//!     "https://sandbox.helix.example/api",
//!     "key",
//!     "secret",
//!     "en-US",
//! ));
//! match helix.get_account(5, 9) {
//!     Ok(account) => println!("{account:?}"),
//!     Err(err) => eprintln!("{}: {}", err.message(), err.data()),
//! }
//! ```

pub mod api;
pub mod client;
pub mod dates;
pub mod error;
pub mod http;
pub mod response;
pub mod transport;
pub mod types;

pub use api::Helix;
pub use client::HelixClient;
pub use dates::TransactionWindow;
pub use error::{ConfigError, ErrorKind, HelixError, TransportError, HELIX_ERROR_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::{status_code_for, ApiResponse};
pub use transport::{Transport, TransportOptions, UreqTransport};
pub use types::ApiCredentials;
