//! Verify assembly and validation against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file lists inputs and expected results. Headers are compared
//! as parsed maps, bodies as parsed JSON, so formatting differences do not
//! cause false negatives.

use bytes::Bytes;
use nick_core::{query, Descriptor, Headers, RequestBody, Response, StatusCodeRanges};

const BASE_URL: &str = "http://localhost:3000/items";

fn vectors(raw: &str) -> Vec<serde_json::Value> {
    let parsed: serde_json::Value = serde_json::from_str(raw).unwrap();
    parsed["cases"].as_array().unwrap().clone()
}

/// Build a `RequestBody` from its test vector description.
fn body_of(case: &serde_json::Value) -> RequestBody {
    match case["kind"].as_str().unwrap() {
        "json" => RequestBody::json(case["value"].clone()),
        "raw" => {
            let data = Bytes::from(case["data"].as_str().unwrap().to_string());
            match case.get("headers") {
                Some(headers) => {
                    let headers: Headers = serde_json::from_value(headers.clone()).unwrap();
                    RequestBody::raw_with_headers(Some(data), headers)
                }
                None => RequestBody::raw(data),
            }
        }
        "empty" => RequestBody::Empty,
        other => panic!("unknown body kind: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Header merge
// ---------------------------------------------------------------------------

#[test]
fn merge_test_vectors() {
    for case in vectors(include_str!("../../test-vectors/merge.json")) {
        let name = case["name"].as_str().unwrap();
        let body = body_of(&case["body"]);
        let caller: Headers = serde_json::from_value(case["caller_headers"].clone()).unwrap();
        let expected: Headers = serde_json::from_value(case["expected_headers"].clone()).unwrap();

        let req = Descriptor::post(BASE_URL, body.clone())
            .with_headers(caller.clone())
            .prepare()
            .unwrap();
        assert_eq!(req.headers, expected, "{name}: merged headers");

        let body_headers = body.produce_headers().unwrap().unwrap_or_default();
        assert_eq!(
            nick_core::headers::merge(body_headers, caller),
            expected,
            "{name}: merge policy"
        );

        if case["body"]["kind"] == "json" {
            let sent: serde_json::Value =
                serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(sent, case["body"]["value"], "{name}: json body");
        }
    }
}

// ---------------------------------------------------------------------------
// Query encoding
// ---------------------------------------------------------------------------

#[test]
fn query_test_vectors() {
    for case in vectors(include_str!("../../test-vectors/query.json")) {
        let name = case["name"].as_str().unwrap();
        let url = case["url"].as_str().unwrap();
        let items: Vec<(String, String)> = serde_json::from_value(case["items"].clone()).unwrap();

        let result = query::append(url, &items);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "MalformedLocator" => assert_eq!(err.locator(), url, "{name}: locator"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            continue;
        }

        let encoded = result.unwrap();
        assert_eq!(
            encoded.query(),
            case["expected_query"].as_str(),
            "{name}: query string"
        );

        // Appended items decode back in order, after the pre-existing ones.
        let decoded: Vec<(String, String)> = encoded.query_pairs().into_owned().collect();
        assert!(decoded.ends_with(&items), "{name}: round trip");
    }
}

// ---------------------------------------------------------------------------
// Status validation
// ---------------------------------------------------------------------------

#[test]
fn status_test_vectors() {
    for case in vectors(include_str!("../../test-vectors/status.json")) {
        let name = case["name"].as_str().unwrap();
        let status = case["status"].as_u64().unwrap() as u16;
        let ranges: Vec<(u16, u16)> = serde_json::from_value(case["ranges"].clone()).unwrap();
        let ranges = StatusCodeRanges::new(ranges.into_iter().map(|(start, end)| start..end));

        let response = Response::new(status, Headers::new(), None);
        let result = response.ensure_status_code(ranges.clone());

        if case["accepted"].as_bool().unwrap() {
            assert!(result.is_ok(), "{name}: expected acceptance");
        } else {
            match result.unwrap_err() {
                nick_core::Error::StatusCode { actual, expected } => {
                    assert_eq!(actual, status, "{name}: actual");
                    assert_eq!(expected, ranges, "{name}: expected ranges");
                }
                other => panic!("{name}: expected StatusCode, got {other:?}"),
            }
        }
    }
}
