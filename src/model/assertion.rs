use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// 断言类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionKind {
    /// 状态码等于期望值
    Status,
    /// 响应耗时（毫秒）不超过期望值
    ResponseTime,
    /// JSON body 中指定路径的值等于期望值
    JsonPath,
    /// 指定响应 Header 等于期望值
    Header,
    /// 响应 body 包含期望子串
    BodyContains,
}

impl AssertionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssertionKind::Status => "status",
            AssertionKind::ResponseTime => "response_time",
            AssertionKind::JsonPath => "json_path",
            AssertionKind::Header => "header",
            AssertionKind::BodyContains => "body_contains",
        }
    }
}

/// 断言 - 定义时只有 kind/expected，执行后填入 actual/passed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: AssertionKind,

    /// 期望值，结构由 kind 决定
    pub expected: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
}

impl Assertion {
    pub fn new(id: impl Into<String>, kind: AssertionKind, expected: Value) -> Self {
        Self {
            id: id.into(),
            kind,
            expected,
            actual: None,
            passed: None,
        }
    }

    pub fn status(id: impl Into<String>, expected: u16) -> Self {
        Self::new(id, AssertionKind::Status, json!(expected))
    }

    pub fn response_time(id: impl Into<String>, max_ms: u64) -> Self {
        Self::new(id, AssertionKind::ResponseTime, json!(max_ms))
    }

    /// expected 形如 {"path": "user.id", "value": 42}
    pub fn json_path(id: impl Into<String>, path: impl Into<String>, value: Value) -> Self {
        Self::new(
            id,
            AssertionKind::JsonPath,
            json!({"path": path.into(), "value": value}),
        )
    }

    /// expected 形如 {"name": "content-type", "value": "application/json"}
    pub fn header(id: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(
            id,
            AssertionKind::Header,
            json!({"name": name.into(), "value": value.into()}),
        )
    }

    pub fn body_contains(id: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(id, AssertionKind::BodyContains, json!(needle.into()))
    }

    /// 带上求值结果，返回新值（不修改定义本身）
    pub fn with_outcome(&self, actual: Option<Value>, passed: bool) -> Self {
        Self {
            actual,
            passed: Some(passed),
            ..self.clone()
        }
    }

    pub fn is_passed(&self) -> bool {
        self.passed == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_snake_case() {
        let a = Assertion::body_contains("a1", "token");
        let json = serde_json::to_string(&a).unwrap();
        assert!(json.contains("\"type\":\"body_contains\""));
    }

    #[test]
    fn test_outcome_does_not_mutate_definition() {
        let a = Assertion::status("a1", 200);
        let evaluated = a.with_outcome(Some(json!(404)), false);

        assert!(a.actual.is_none());
        assert!(a.passed.is_none());
        assert_eq!(evaluated.actual, Some(json!(404)));
        assert_eq!(evaluated.passed, Some(false));
        assert_eq!(evaluated.expected, a.expected);
    }

    #[test]
    fn test_json_path_expected_shape() {
        let a = Assertion::json_path("a1", "user.id", json!(42));
        assert_eq!(a.expected["path"], json!("user.id"));
        assert_eq!(a.expected["value"], json!(42));
    }
}
