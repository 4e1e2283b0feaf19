//! Request descriptors: immutable blueprints of a request.
//!
//! # Design
//! A `Descriptor` stores *functions* that resolve the URL and the caller
//! headers, not resolved values. They run every time the descriptor is
//! prepared, which lets callers compute values that depend on the moment of
//! sending (timestamps, signatures, rotating tokens). Descriptors are cheap to
//! clone and can be executed any number of times.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::body::RequestBody;
use crate::error::{EncodingError, MalformedLocatorError};
use crate::headers::{self, Headers};
use crate::http::{HttpMethod, HttpRequest};
use crate::query::{self, Query};

type UrlFn = dyn Fn() -> Result<Url, MalformedLocatorError> + Send + Sync;
type HeaderFn = dyn Fn() -> Result<Headers, EncodingError> + Send + Sync;

/// Method, URL, headers and body of a request, resolved lazily.
#[derive(Clone)]
pub struct Descriptor {
    method: HttpMethod,
    url: Arc<UrlFn>,
    headers: Arc<HeaderFn>,
    body: RequestBody,
}

impl Descriptor {
    /// A request to `locator`, parsed when the descriptor is prepared.
    pub fn new(method: HttpMethod, locator: impl Into<String>) -> Self {
        let locator = locator.into();
        Self::deferred(method, move || query::append(&locator, &()))
    }

    /// A request whose URL is computed by `url` at every preparation.
    pub fn deferred<F>(method: HttpMethod, url: F) -> Self
    where
        F: Fn() -> Result<Url, MalformedLocatorError> + Send + Sync + 'static,
    {
        Self {
            method,
            url: Arc::new(url),
            headers: Arc::new(|| Ok(Headers::new())),
            body: RequestBody::Empty,
        }
    }

    pub fn get(locator: impl Into<String>, query: impl Query) -> Self {
        Self::new(HttpMethod::Get, locator).with_query(query)
    }

    pub fn post(locator: impl Into<String>, body: RequestBody) -> Self {
        Self {
            body,
            ..Self::new(HttpMethod::Post, locator)
        }
    }

    /// Append query items to whatever URL the descriptor resolves to.
    ///
    /// Items are captured now; the URL is still resolved lazily.
    pub fn with_query(self, query: impl Query) -> Self {
        let items = query.query_items();
        if items.is_empty() {
            return self;
        }
        let base = self.url;
        Self {
            url: Arc::new(move || query::extend(base()?, &items)),
            ..self
        }
    }

    /// Use a fixed set of caller headers.
    pub fn with_headers(self, headers: impl Into<Headers>) -> Self {
        let headers = headers.into();
        self.with_header_fn(move || Ok(headers.clone()))
    }

    /// Compute caller headers at every preparation.
    pub fn with_header_fn<F>(self, headers: F) -> Self
    where
        F: Fn() -> Result<Headers, EncodingError> + Send + Sync + 'static,
    {
        Self {
            headers: Arc::new(headers),
            ..self
        }
    }

    /// Attach a body. Bodyless methods only accept [`RequestBody::Empty`].
    pub fn with_body(self, body: RequestBody) -> Result<Self, EncodingError> {
        if !body.is_empty() && !self.method.permits_body() {
            return Err(EncodingError::BodyNotPermitted(self.method));
        }
        Ok(Self { body, ..self })
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Run every assembly step and produce the request the transport will
    /// see.
    ///
    /// Caller headers are merged over the body's headers, so a caller value
    /// replaces a body default under the same name.
    pub fn prepare(&self) -> Result<HttpRequest, EncodingError> {
        let url = (self.url)()?;
        let method = self.method;
        let body = self.body.produce_data()?;
        let body_headers = self.body.produce_headers()?.unwrap_or_default();
        let caller_headers = (self.headers)()?;

        Ok(HttpRequest {
            method,
            url,
            headers: headers::merge(body_headers, caller_headers),
            body,
        })
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("method", &self.method)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}
