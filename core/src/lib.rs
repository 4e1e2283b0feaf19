//! Deferred HTTP calls over a pluggable transport.
//!
//! # Overview
//! A [`Descriptor`] describes a request: method, a lazily resolved URL, lazily
//! resolved caller headers and a [`RequestBody`]. A [`Client`] turns a
//! descriptor into a [`Call`], a single deferred operation that yields either
//! a [`Response`] or an [`Error`], or nothing at all when it is cancelled.
//! The transport that actually moves bytes is supplied by the caller through
//! the [`Transport`] trait; with the default `reqwest` feature,
//! `reqwest::Client` is one, and the default `rustls` feature gives it TLS.
//!
//! # Design
//! - Assembly runs before the transport is contacted: URL, body bytes, body
//!   headers, then caller headers merged over body headers
//!   ([`headers::merge`]).
//! - Header names are case-insensitive and stored lowercase.
//! - Every failure is one [`Error`] variant; transport and codec errors are
//!   wrapped, never surfaced as their own types.
//! - Payloads are JSON, decoded with `serde_json`.
//!
//! ```no_run
//! # async fn demo() -> Result<(), nick_core::Error> {
//! use nick_core::{Client, Headers, StatusCodeRanges};
//!
//! let client = Client::new(reqwest::Client::new());
//! let response = client
//!     .get("https://example.com/search", [("q", "rust")], Headers::new())
//!     .await?;
//! response.ensure_status_code(StatusCodeRanges::SUCCESS)?;
//! let value: serde_json::Value = response.decode()?;
//! # let _ = value;
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod client;
pub mod descriptor;
pub mod error;
pub mod headers;
pub mod http;
pub mod query;
pub mod response;
pub mod status;
pub mod transport;

pub use body::RequestBody;
pub use client::{Call, Client, InFlight};
pub use descriptor::Descriptor;
pub use error::{BoxError, EncodingError, Error, MalformedLocatorError};
pub use headers::Headers;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::Query;
pub use response::Response;
pub use status::StatusCodeRanges;
pub use transport::Transport;
pub use url::Url;
