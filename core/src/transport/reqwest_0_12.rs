use bytes::Bytes;

use super::Transport;
use crate::headers::Headers;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

impl Transport for reqwest::Client {
    type Error = reqwest::Error;

    /// Converts the assembled request into a `reqwest::Request` and sends it.
    ///
    /// Invalid header names or values surface from `send` as a
    /// `reqwest::Error`. Repeated response headers are joined with `", "`.
    /// Only 204 and 304 responses report no payload; any other status keeps
    /// its body, even when it is empty.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.request(method_of(method), url);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body: payload_of(status, body),
        })
    }
}

fn method_of(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn collect_headers(map: &reqwest::header::HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for name in map.keys() {
        let joined = map
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        headers.insert(name.as_str(), joined);
    }
    headers
}

fn payload_of(status: u16, body: Bytes) -> Option<Bytes> {
    match status {
        204 | 304 if body.is_empty() => None,
        _ => Some(body),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE};

    use super::*;

    #[test]
    fn repeated_headers_are_joined() {
        let mut map = HeaderMap::new();
        map.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        map.append(SET_COOKIE, HeaderValue::from_static("b=2"));
        map.insert("x-single", HeaderValue::from_static("yes"));

        let headers = collect_headers(&map);
        assert_eq!(headers.get("set-cookie"), Some("a=1, b=2"));
        assert_eq!(headers.get("x-single"), Some("yes"));
    }

    #[test]
    fn only_bodyless_statuses_drop_the_payload() {
        assert_eq!(payload_of(204, Bytes::new()), None);
        assert_eq!(payload_of(304, Bytes::new()), None);
        assert_eq!(payload_of(200, Bytes::new()), Some(Bytes::new()));
        assert_eq!(payload_of(404, Bytes::new()), Some(Bytes::new()));
        assert_eq!(
            payload_of(200, Bytes::from_static(b"x")),
            Some(Bytes::from_static(b"x"))
        );
    }

    #[test]
    fn methods_map_to_reqwest() {
        assert_eq!(method_of(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(method_of(HttpMethod::Delete), reqwest::Method::DELETE);
    }
}
