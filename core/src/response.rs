//! The response envelope handed to callers.
//!
//! # Design
//! A `Response` is read-only. Validation and decoding borrow it, so a failed
//! decode still leaves status, headers and the raw payload available for
//! diagnostics.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::headers::Headers;
use crate::http::HttpResponse;
use crate::status::StatusCodeRanges;

/// Status, headers and optional payload of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    headers: Headers,
    payload: Option<Bytes>,
}

impl Response {
    pub fn new(status: u16, headers: Headers, payload: Option<Bytes>) -> Self {
        Self {
            status,
            headers,
            payload,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<Bytes> {
        self.payload
    }

    /// Whether the status is in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        StatusCodeRanges::SUCCESS.contains(self.status)
    }

    /// Fail with [`Error::StatusCode`] unless one of `ranges` contains the
    /// status.
    pub fn ensure_status_code(&self, ranges: impl Into<StatusCodeRanges>) -> Result<(), Error> {
        let ranges = ranges.into();
        if ranges.contains(self.status) {
            return Ok(());
        }
        Err(Error::StatusCode {
            actual: self.status,
            expected: ranges,
        })
    }

    /// The payload, or [`Error::MissingPayload`].
    pub fn ensure_payload(&self) -> Result<&Bytes, Error> {
        self.payload.as_ref().ok_or(Error::MissingPayload)
    }

    /// Decode the JSON payload into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let payload = self.ensure_payload()?;
        serde_json::from_slice(payload).map_err(Error::Parsing)
    }
}

impl From<HttpResponse> for Response {
    fn from(response: HttpResponse) -> Self {
        Self::new(response.status, response.headers, response.body)
    }
}
