use serde_json::{Value, json};

use crate::http::ResponseSnapshot;
use crate::model::{Assertion, AssertionKind};

/// 对单条断言求值，返回填好 actual/passed 的新断言
///
/// expected 格式不合法（如 json_path 缺 "path"）时判为失败而不是报错，
/// 断言级别没有错误通道
pub fn evaluate_assertion(assertion: &Assertion, response: &ResponseSnapshot) -> Assertion {
    match assertion.kind {
        AssertionKind::Status => {
            let actual = json!(response.status);
            let passed = assertion.expected.as_u64() == Some(response.status as u64);
            assertion.with_outcome(Some(actual), passed)
        }

        AssertionKind::ResponseTime => {
            let actual = json!(response.duration_ms);
            let passed = match assertion.expected.as_u64() {
                Some(max_ms) => response.duration_ms <= max_ms,
                None => false,
            };
            assertion.with_outcome(Some(actual), passed)
        }

        AssertionKind::JsonPath => {
            let path = assertion.expected.get("path").and_then(Value::as_str);
            let expected_value = assertion.expected.get("value");

            let (path, expected_value) = match (path, expected_value) {
                (Some(p), Some(v)) => (p, v),
                _ => return assertion.with_outcome(None, false),
            };

            match extract_json_path(&response.body, path) {
                Some(actual) => {
                    let passed = &actual == expected_value;
                    assertion.with_outcome(Some(actual), passed)
                }
                None => assertion.with_outcome(None, false),
            }
        }

        AssertionKind::Header => {
            let name = assertion.expected.get("name").and_then(Value::as_str);
            let expected_value = assertion.expected.get("value").and_then(Value::as_str);

            let (name, expected_value) = match (name, expected_value) {
                (Some(n), Some(v)) => (n, v),
                _ => return assertion.with_outcome(None, false),
            };

            match response.header(name) {
                Some(actual) => {
                    let passed = actual == expected_value;
                    assertion.with_outcome(Some(json!(actual)), passed)
                }
                None => assertion.with_outcome(None, false),
            }
        }

        AssertionKind::BodyContains => {
            let needle = match assertion.expected.as_str() {
                Some(s) => s,
                None => return assertion.with_outcome(None, false),
            };
            let passed = response.body.contains(needle);
            assertion.with_outcome(Some(json!(response.body.clone())), passed)
        }
    }
}

/// 按点号分隔的路径从 JSON body 中提取值，数字段视为数组下标
fn extract_json_path(body: &str, path: &str) -> Option<Value> {
    let root: Value = serde_json::from_str(body).ok()?;

    let mut current = &root;
    for segment in path.split('.') {
        current = match current {
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => current.get(segment)?,
        };
    }
    Some(current.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response(status: u16, body: &str, duration_ms: u64) -> ResponseSnapshot {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        ResponseSnapshot {
            status,
            headers,
            body: body.to_string(),
            duration_ms,
        }
    }

    #[test]
    fn test_status_assertion_passes() {
        let assertion = Assertion::status("a1", 200);
        let result = evaluate_assertion(&assertion, &response(200, "{}", 10));
        assert_eq!(result.passed, Some(true));
        assert_eq!(result.actual, Some(json!(200)));
    }

    #[test]
    fn test_status_assertion_fails() {
        let assertion = Assertion::status("a1", 200);
        let result = evaluate_assertion(&assertion, &response(404, "{}", 10));
        assert_eq!(result.passed, Some(false));
        assert_eq!(result.actual, Some(json!(404)));
    }

    #[test]
    fn test_response_time_within_limit() {
        let assertion = Assertion::response_time("a1", 200);
        let result = evaluate_assertion(&assertion, &response(200, "{}", 150));
        assert_eq!(result.passed, Some(true));

        let result = evaluate_assertion(&assertion, &response(200, "{}", 250));
        assert_eq!(result.passed, Some(false));
    }

    #[test]
    fn test_json_path_nested() {
        let assertion = Assertion::json_path("a1", "user.id", json!(123));
        let result = evaluate_assertion(&assertion, &response(200, r#"{"user":{"id":123}}"#, 10));
        assert_eq!(result.passed, Some(true));
        assert_eq!(result.actual, Some(json!(123)));
    }

    #[test]
    fn test_json_path_array_index() {
        let assertion = Assertion::json_path("a1", "items.1.name", json!("b"));
        let body = r#"{"items":[{"name":"a"},{"name":"b"}]}"#;
        let result = evaluate_assertion(&assertion, &response(200, body, 10));
        assert_eq!(result.passed, Some(true));
    }

    #[test]
    fn test_json_path_missing_path_fails() {
        let assertion = Assertion::json_path("a1", "user.missing", json!(1));
        let result = evaluate_assertion(&assertion, &response(200, r#"{"user":{}}"#, 10));
        assert_eq!(result.passed, Some(false));
        assert!(result.actual.is_none());
    }

    #[test]
    fn test_json_path_malformed_expected_fails() {
        let assertion = Assertion::new("a1", AssertionKind::JsonPath, json!({"value": 1}));
        let result = evaluate_assertion(&assertion, &response(200, "{}", 10));
        assert_eq!(result.passed, Some(false));
    }

    #[test]
    fn test_header_assertion_case_insensitive_name() {
        let assertion = Assertion::header("a1", "Content-Type", "application/json");
        let result = evaluate_assertion(&assertion, &response(200, "{}", 10));
        assert_eq!(result.passed, Some(true));
    }

    #[test]
    fn test_header_assertion_missing_header() {
        let assertion = Assertion::header("a1", "x-request-id", "abc");
        let result = evaluate_assertion(&assertion, &response(200, "{}", 10));
        assert_eq!(result.passed, Some(false));
        assert!(result.actual.is_none());
    }

    #[test]
    fn test_body_contains() {
        let assertion = Assertion::body_contains("a1", "token");
        let result = evaluate_assertion(&assertion, &response(200, r#"{"token":"x"}"#, 10));
        assert_eq!(result.passed, Some(true));

        let result = evaluate_assertion(&assertion, &response(200, "{}", 10));
        assert_eq!(result.passed, Some(false));
    }

    #[test]
    fn test_evaluation_does_not_mutate_definition() {
        let assertion = Assertion::status("a1", 200);
        let _ = evaluate_assertion(&assertion, &response(404, "{}", 10));
        assert!(assertion.passed.is_none());
        assert!(assertion.actual.is_none());
    }
}
