//! The transport boundary.
//!
//! This layer never opens sockets itself. A [`Transport`] receives a fully
//! assembled [`HttpRequest`] and reports either an [`HttpResponse`] or its
//! own error, which the client wraps as [`Error::Network`](crate::Error::Network).
//!
//! Cancellation is expressed by dropping the future returned from
//! [`Transport::send`]. Implementations must abort the in-flight exchange when
//! that happens.

#[cfg(feature = "reqwest")]
mod reqwest_0_12;

use std::future::Future;

use crate::http::{HttpRequest, HttpResponse};

/// Sends one request and reports its outcome.
///
/// A single transport is shared by every call made through a
/// [`Client`](crate::Client), possibly concurrently.
pub trait Transport: Send + Sync + 'static {
    /// The error reported for a failed exchange.
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;
}
