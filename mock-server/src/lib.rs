//! HTTP server that reflects requests back, for exercising clients end to end.
//!
//! Routes:
//! - `ANY /echo` — 200 with an [`Echo`] of the received request.
//! - `ANY /status/{code}` — responds with `code` and a small JSON body.
//! - `GET /empty` — 204 without a body.
//! - `GET /blank` — 200 with a zero-length body.
//! - `GET /delay/{ms}` — waits `ms` milliseconds, then answers like `/echo`.

use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Request},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the server saw of a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: u16,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/empty", get(empty))
        .route("/blank", get(blank))
        .route("/delay/{ms}", get(delay))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    tracing::debug!(%method, %uri, "echo");
    Json(reflect(&method, &uri, &headers, &body))
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, Json<StatusBody>), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, Json(StatusBody { status: code })))
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn blank() -> StatusCode {
    StatusCode::OK
}

async fn delay(Path(ms): Path<u64>, request: Request) -> Json<Echo> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    let (parts, _) = request.into_parts();
    Json(reflect(&parts.method, &parts.uri, &parts.headers, &Bytes::new()))
}

fn reflect(method: &Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) -> Echo {
    let mut seen = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        seen.entry(name.as_str().to_string())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.clone());
    }
    Echo {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: seen,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}
