//! Request bodies.
//!
//! A body contributes two things to a request: payload bytes and headers.
//! Both are produced at execution time, every time the owning descriptor is
//! prepared, so a descriptor can be executed repeatedly.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;

use crate::error::EncodingError;
use crate::headers::Headers;

type Encoder = dyn Fn() -> serde_json::Result<Vec<u8>> + Send + Sync;

/// The body of a request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No payload and no headers. The only body a bodyless method accepts.
    #[default]
    Empty,

    /// Opaque bytes and headers passed through untouched.
    Raw {
        data: Option<Bytes>,
        headers: Option<Headers>,
    },

    /// A value serialized as JSON, with `content-type: application/json`.
    Json(JsonBody),
}

impl RequestBody {
    /// Wrap `value` for JSON encoding at execution time.
    pub fn json<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        RequestBody::Json(JsonBody {
            encode: Arc::new(move || serde_json::to_vec(&value)),
        })
    }

    pub fn raw(data: impl Into<Bytes>) -> Self {
        RequestBody::Raw {
            data: Some(data.into()),
            headers: None,
        }
    }

    pub fn raw_with_headers(data: Option<Bytes>, headers: impl Into<Headers>) -> Self {
        RequestBody::Raw {
            data,
            headers: Some(headers.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }

    /// Payload bytes to send, if any.
    pub fn produce_data(&self) -> Result<Option<Bytes>, EncodingError> {
        match self {
            RequestBody::Empty => Ok(None),
            RequestBody::Raw { data, .. } => Ok(data.clone()),
            RequestBody::Json(json) => {
                let bytes = (json.encode)().map_err(EncodingError::Body)?;
                Ok(Some(Bytes::from(bytes)))
            }
        }
    }

    /// Headers the body contributes, before caller headers are merged over
    /// them.
    pub fn produce_headers(&self) -> Result<Option<Headers>, EncodingError> {
        match self {
            RequestBody::Empty => Ok(None),
            RequestBody::Raw { headers, .. } => Ok(headers.clone()),
            RequestBody::Json(_) => Ok(Some(Headers::from([("content-type", "application/json")]))),
        }
    }
}

/// A JSON body. Holds the value behind a shared encoder so the body stays
/// cheap to clone.
#[derive(Clone)]
pub struct JsonBody {
    encode: Arc<Encoder>,
}

impl fmt::Debug for JsonBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonBody").finish_non_exhaustive()
    }
}
