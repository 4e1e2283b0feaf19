//! HTTP transport messages described as plain data.
//!
//! # Design
//! `HttpRequest` is the fully assembled request handed to a
//! [`Transport`](crate::Transport); `HttpResponse` is what the transport hands
//! back. Neither type carries behavior beyond accessors. Status validation
//! and decoding live on [`Response`](crate::Response), which is built from an
//! `HttpResponse` once the round-trip has completed.

use std::fmt;

use bytes::Bytes;
use url::Url;

use crate::headers::Headers;

/// HTTP method for a request.
///
/// `Get` and `Delete` are bodyless: a [`Descriptor`](crate::Descriptor)
/// refuses to attach a non-empty body to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// The verb as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method may carry a body.
    pub fn permits_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully assembled request, ready for the transport.
///
/// Produced by [`Descriptor::prepare`](crate::Descriptor::prepare). Headers
/// are already merged and the body is already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Headers,
    pub body: Option<Bytes>,
}

/// A completed round-trip as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Option<Bytes>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_verbs() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn only_post_and_put_carry_bodies() {
        assert!(!HttpMethod::Get.permits_body());
        assert!(!HttpMethod::Delete.permits_body());
        assert!(HttpMethod::Post.permits_body());
        assert!(HttpMethod::Put.permits_body());
    }
}
