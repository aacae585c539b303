use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Assertion;
use crate::{Result, RusuiteError};

/// HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl FromStr for Method {
    type Err = RusuiteError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            _ => Err(RusuiteError::ParseError(format!(
                "Invalid HTTP method: {}",
                s
            ))),
        }
    }
}

impl Method {
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 套件状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SuiteStatus {
    #[default]
    Active,
    Inactive,
}

/// 单个测试用例的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    #[default]
    Pending,
    Running,
}

/// 测试用例 - 一个待执行的 HTTP 请求及其断言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// 套件内唯一 ID
    pub id: String,

    pub name: String,

    pub method: Method,

    pub url: String,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// 请求体（可选，任意 JSON 值）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,

    /// 期望的响应状态码
    pub expected_status: u16,

    #[serde(default)]
    pub assertions: Vec<Assertion>,

    #[serde(default)]
    pub status: TestStatus,

    /// 上次执行时间
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,

    /// 上次执行耗时（毫秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl TestCase {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        method: Method,
        url: impl Into<String>,
        expected_status: u16,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            expected_status,
            assertions: Vec::new(),
            status: TestStatus::Pending,
            last_run: None,
            duration_ms: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }
}

/// 测试套件 - 一组有序的测试用例
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuite {
    /// 全局唯一 ID
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tests: Vec<TestCase>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub status: SuiteStatus,
}

impl TestSuite {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tests: Vec::new(),
            created_at: now,
            updated_at: now,
            status: SuiteStatus::Active,
        }
    }

    pub fn with_test(mut self, test: TestCase) -> Self {
        self.tests.push(test);
        self
    }

    /// 刷新 updated_at
    ///
    /// 时间戳由调用方在 dispatch 之前打上，transition 函数本身不读时钟
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn test(&self, test_id: &str) -> Option<&TestCase> {
        self.tests.iter().find(|t| t.id == test_id)
    }
}
