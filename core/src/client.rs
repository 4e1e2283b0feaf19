//! Request execution: turning descriptors into single-outcome calls.
//!
//! # Design
//! `Client` holds only a shared reference to a [`Transport`] and carries no
//! mutable state between calls. [`Client::execute`] returns a [`Call`], which
//! does nothing until it is driven:
//!
//! - awaiting a `Call` runs it inline; dropping that future aborts it;
//! - [`Call::start`] spawns it on the tokio runtime and returns an
//!   [`InFlight`] handle that can be cancelled from anywhere it is reachable.
//!
//! Either way a call yields at most one outcome. Request assembly is
//! synchronous and happens before the transport is contacted, so an
//! assembly failure never reaches the network.

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;
use tracing::{debug, warn, Instrument};
use uuid::Uuid;

use crate::body::RequestBody;
use crate::descriptor::Descriptor;
use crate::error::Error;
use crate::headers::Headers;
use crate::query::Query;
use crate::response::Response;
use crate::transport::Transport;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Executes descriptors against a shared transport.
#[derive(Debug)]
pub struct Client<T> {
    transport: Arc<T>,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    /// Use a transport that is already shared with other owners.
    pub fn from_shared(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// A deferred call for `descriptor`.
    ///
    /// The descriptor is cloned; the original can be executed again.
    pub fn execute(&self, descriptor: &Descriptor) -> Call<T> {
        Call {
            transport: Arc::clone(&self.transport),
            descriptor: descriptor.clone(),
        }
    }

    /// `GET locator` with `query` appended and `headers` sent as caller
    /// headers. Pass `()` for no query.
    pub fn get(
        &self,
        locator: impl Into<String>,
        query: impl Query,
        headers: impl Into<Headers>,
    ) -> Call<T> {
        self.execute(&Descriptor::get(locator, query).with_headers(headers))
    }

    /// `POST locator` with `body`; `headers` override the body's own headers.
    pub fn post(
        &self,
        locator: impl Into<String>,
        body: RequestBody,
        headers: impl Into<Headers>,
    ) -> Call<T> {
        self.execute(&Descriptor::post(locator, body).with_headers(headers))
    }
}

#[cfg(feature = "reqwest")]
impl Default for Client<reqwest::Client> {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

/// A deferred request. Inert until awaited or started.
#[must_use = "a call does nothing unless awaited or started"]
pub struct Call<T> {
    transport: Arc<T>,
    descriptor: Descriptor,
}

impl<T: Transport> Call<T> {
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Spawn the call on the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn start(self) -> InFlight {
        InFlight {
            handle: tokio::spawn(self.into_future()),
            cancelled: AtomicBool::new(false),
        }
    }

    async fn run(self) -> Result<Response, Error> {
        let request = match self.descriptor.prepare() {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "request assembly failed");
                return Err(Error::Encoding(err));
            }
        };

        tracing::Span::current().record("url", request.url.as_str());
        debug!("dispatching request");

        let response = self.transport.send(request).await.map_err(|err| {
            debug!(error = %err, "transport failed");
            Error::Network(Box::new(err))
        })?;

        debug!(status = response.status, "response received");
        Ok(Response::from(response))
    }
}

impl<T: Transport> IntoFuture for Call<T> {
    type Output = Result<Response, Error>;
    type IntoFuture = BoxFuture<Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let span = tracing::debug_span!(
            "call",
            call_id = %Uuid::new_v4(),
            method = %self.descriptor.method(),
            url = tracing::field::Empty,
        );
        Box::pin(self.run().instrument(span))
    }
}

/// A started call.
///
/// Resolves to `Some(outcome)` when the call completes, or `None` when it was
/// cancelled first. Dropping the handle cancels the call.
#[must_use = "dropping an InFlight cancels the call"]
#[derive(Debug)]
pub struct InFlight {
    handle: JoinHandle<Result<Response, Error>>,
    cancelled: AtomicBool,
}

impl InFlight {
    /// Abort the call unless it already finished.
    ///
    /// The transport's in-flight future is dropped and no outcome is
    /// delivered. Calling this more than once, or after completion, does
    /// nothing.
    pub fn cancel(&self) {
        if self.handle.is_finished() {
            return;
        }
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            debug!("call cancelled");
            self.handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for InFlight {
    type Output = Option<Result<Response, Error>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let joined = match Pin::new(&mut this.handle).poll(cx) {
            Poll::Ready(joined) => joined,
            Poll::Pending => return Poll::Pending,
        };
        if this.is_cancelled() {
            // the task is gone, and with it the transport future
            return Poll::Ready(None);
        }
        match joined {
            Ok(outcome) => Poll::Ready(Some(outcome)),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Poll::Ready(None),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use bytes::Bytes;

    use super::*;
    use crate::error::EncodingError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Records every request and answers with a fixed response.
    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl Recorder {
        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for Recorder {
        type Error = std::io::Error;

        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
            self.requests.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: 200,
                headers: Headers::from([("content-type", "application/json")]),
                body: Some(Bytes::from_static(br#"{"ok":true}"#)),
            })
        }
    }

    struct Refusing;

    impl Transport for Refusing {
        type Error = std::io::Error;

        async fn send(&self, _: HttpRequest) -> Result<HttpResponse, Self::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"))
        }
    }

    #[tokio::test]
    async fn get_sends_assembled_request() {
        let client = Client::new(Recorder::default());
        let res = client
            .get("https://h/p?z=1", [("q", "x"), ("q", "y")], [("Accept", "application/json")])
            .await
            .unwrap();
        assert_eq!(res.status(), 200);

        let sent = client.transport().requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, HttpMethod::Get);
        assert_eq!(sent[0].url.query(), Some("z=1&q=x&q=y"));
        assert_eq!(sent[0].headers.get("accept"), Some("application/json"));
        assert!(sent[0].body.is_none());
    }

    #[tokio::test]
    async fn post_caller_headers_override_body_headers() {
        let client = Client::new(Recorder::default());
        client
            .post(
                "http://localhost/items",
                RequestBody::json(serde_json::json!({ "a": 1 })),
                [("content-type", "application/merge-patch+json")],
            )
            .await
            .unwrap();

        let sent = client.transport().requests();
        assert_eq!(sent[0].headers.get("content-type"), Some("application/merge-patch+json"));
        assert_eq!(sent[0].headers.len(), 1);
    }

    #[tokio::test]
    async fn assembly_failure_never_reaches_transport() {
        let client = Client::new(Recorder::default());
        let err = client.get("not a url", (), Headers::new()).await.unwrap_err();
        assert!(matches!(err, Error::Encoding(EncodingError::Locator(_))));
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        let client = Client::new(Refusing);
        let err = client.get("http://localhost/", (), Headers::new()).await.unwrap_err();
        let cause = match err {
            Error::Network(cause) => cause,
            other => panic!("expected Network, got {other:?}"),
        };
        let io = cause.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
    }

    #[tokio::test]
    async fn descriptor_is_reusable() {
        let client = Client::new(Recorder::default());
        let descriptor = Descriptor::get("http://localhost/ping", ());
        client.execute(&descriptor).await.unwrap();
        client.execute(&descriptor).await.unwrap();
        assert_eq!(client.transport().requests().len(), 2);
    }

    #[tokio::test]
    async fn started_call_delivers_outcome() {
        let client = Client::new(Recorder::default());
        let call = client.get("http://localhost/", (), Headers::new()).start();
        let res = call.await.expect("not cancelled").unwrap();
        assert_eq!(res.decode::<serde_json::Value>().unwrap(), serde_json::json!({ "ok": true }));
    }

    #[tokio::test]
    async fn unstarted_call_sends_nothing() {
        let client = Client::new(Recorder::default());
        let call = client.get("http://localhost/", (), Headers::new());
        drop(call);
        assert!(client.transport().requests().is_empty());
    }
}
