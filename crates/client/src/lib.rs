//! HTTP access to the HR backend.
//!
//! [`Transport`] is the seam between typed operations and the wire. The
//! [`HttpTransport`] implementation uses `reqwest`; [`mock::ScriptedTransport`]
//! replays canned responses for tests. [`HrClient`] maps every backend
//! endpoint onto a typed call.

#![warn(missing_docs)]

pub mod trait_;
pub mod config;
pub mod form;
pub mod http;
pub mod api;
pub mod mock;

pub use trait_::{Transport, ApiRequest, ApiError, Method, RequestBody, Result};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use form::{MultipartForm, FilePart};
pub use http::HttpTransport;
pub use api::{HrClient, Created};
