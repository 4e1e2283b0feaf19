//! Error types for request assembly, transport and response handling.
//!
//! # Design
//! Every failure a call can produce is one [`Error`] variant, so callers can
//! match on the kind without knowing the transport's or the codec's error
//! types. Causes stay reachable through [`std::error::Error::source`].
//!
//! Failures that happen before the transport is contacted are grouped under
//! [`Error::Encoding`]; [`EncodingError`] tells which assembly step failed.
//! [`MalformedLocatorError`] is its own type because the query encoder is
//! usable on its own, outside of a call.

use std::error::Error as StdError;
use std::fmt;

use crate::http::HttpMethod;
use crate::status::StatusCodeRanges;

/// Boxed error for causes coming from generic collaborators.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Terminal failure of a call or of a response operation.
#[derive(Debug)]
pub enum Error {
    /// The outgoing request could not be built. The transport was never
    /// contacted.
    Encoding(EncodingError),

    /// The transport reported a failure (DNS, connect, TLS, timeout, ...).
    Network(BoxError),

    /// A payload was required but the response carried none.
    MissingPayload,

    /// The payload could not be decoded into the requested type.
    Parsing(serde_json::Error),

    /// The status code is outside every accepted range.
    StatusCode {
        actual: u16,
        expected: StatusCodeRanges,
    },
}

impl Error {
    pub fn is_encoding(&self) -> bool {
        matches!(self, Error::Encoding(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    /// The offending status code, for `StatusCode` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::StatusCode { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Encoding(err) => write!(f, "failed to build request: {err}"),
            Error::Network(err) => write!(f, "transport failed: {err}"),
            Error::MissingPayload => write!(f, "response carried no payload"),
            Error::Parsing(err) => write!(f, "failed to decode payload: {err}"),
            Error::StatusCode { actual, expected } => {
                write!(f, "unexpected status {actual}, expected one of {expected}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Encoding(err) => Some(err),
            Error::Network(err) => Some(err.as_ref()),
            Error::Parsing(err) => Some(err),
            Error::MissingPayload | Error::StatusCode { .. } => None,
        }
    }
}

impl From<EncodingError> for Error {
    fn from(err: EncodingError) -> Self {
        Error::Encoding(err)
    }
}

impl From<MalformedLocatorError> for Error {
    fn from(err: MalformedLocatorError) -> Self {
        Error::Encoding(EncodingError::Locator(err))
    }
}

/// The assembly step that failed while building a request.
#[derive(Debug)]
pub enum EncodingError {
    /// The URL could not be resolved.
    Locator(MalformedLocatorError),

    /// The body value could not be serialized.
    Body(serde_json::Error),

    /// A non-empty body was attached to a bodyless method.
    BodyNotPermitted(HttpMethod),

    /// A deferred header function failed.
    Headers(BoxError),
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingError::Locator(err) => write!(f, "{err}"),
            EncodingError::Body(err) => write!(f, "body serialization failed: {err}"),
            EncodingError::BodyNotPermitted(method) => {
                write!(f, "{method} requests cannot carry a body")
            }
            EncodingError::Headers(err) => write!(f, "header resolution failed: {err}"),
        }
    }
}

impl StdError for EncodingError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            EncodingError::Locator(err) => Some(err),
            EncodingError::Body(err) => Some(err),
            EncodingError::BodyNotPermitted(_) => None,
            EncodingError::Headers(err) => Some(err.as_ref()),
        }
    }
}

impl From<MalformedLocatorError> for EncodingError {
    fn from(err: MalformedLocatorError) -> Self {
        EncodingError::Locator(err)
    }
}

/// A locator that could not be turned into a hierarchical URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLocatorError {
    locator: String,
    reason: LocatorFault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocatorFault {
    Parse(url::ParseError),
    NotHierarchical,
}

impl MalformedLocatorError {
    pub(crate) fn parse(locator: &str, err: url::ParseError) -> Self {
        Self {
            locator: locator.to_string(),
            reason: LocatorFault::Parse(err),
        }
    }

    pub(crate) fn not_hierarchical(locator: &str) -> Self {
        Self {
            locator: locator.to_string(),
            reason: LocatorFault::NotHierarchical,
        }
    }

    /// The locator as supplied by the caller.
    pub fn locator(&self) -> &str {
        &self.locator
    }
}

impl fmt::Display for MalformedLocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            LocatorFault::Parse(err) => write!(f, "malformed locator {:?}: {err}", self.locator),
            LocatorFault::NotHierarchical => {
                write!(f, "locator {:?} is not a hierarchical URL", self.locator)
            }
        }
    }
}

impl StdError for MalformedLocatorError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.reason {
            LocatorFault::Parse(err) => Some(err),
            LocatorFault::NotHierarchical => None,
        }
    }
}
