use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::ResponseSnapshot;
use crate::model::Assertion;

/// 一次执行的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

/// 单个测试结果的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Passed,
    Failed,
    Skipped,
}

/// 执行摘要，满足 total == passed + failed + skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let passed = results
            .iter()
            .filter(|r| r.status == ResultStatus::Passed)
            .count();
        let skipped = results
            .iter()
            .filter(|r| r.status == ResultStatus::Skipped)
            .count();

        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed - skipped,
            skipped,
        }
    }
}

/// 单个测试用例的执行结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test_id: String,

    pub status: ResultStatus,

    /// 执行耗时（毫秒）
    pub duration_ms: u64,

    /// 响应快照（网络错误或跳过时为空）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSnapshot>,

    /// 已求值的断言
    #[serde(default)]
    pub assertions: Vec<Assertion>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestResult {
    pub fn passed(
        test_id: impl Into<String>,
        duration_ms: u64,
        response: ResponseSnapshot,
        assertions: Vec<Assertion>,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            status: ResultStatus::Passed,
            duration_ms,
            response: Some(response),
            assertions,
            error: None,
        }
    }

    pub fn failed(
        test_id: impl Into<String>,
        duration_ms: u64,
        response: Option<ResponseSnapshot>,
        assertions: Vec<Assertion>,
        error: Option<String>,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            status: ResultStatus::Failed,
            duration_ms,
            response,
            assertions,
            error,
        }
    }

    pub fn skipped(test_id: impl Into<String>) -> Self {
        Self {
            test_id: test_id.into(),
            status: ResultStatus::Skipped,
            duration_ms: 0,
            response: None,
            assertions: Vec::new(),
            error: None,
        }
    }
}

/// 一次套件执行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRun {
    pub id: String,

    /// 所属套件 ID
    pub suite_id: String,

    pub status: RunStatus,

    pub start_time: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub results: Vec<TestResult>,

    pub summary: RunSummary,
}

impl TestRun {
    pub fn started(id: impl Into<String>, suite_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            suite_id: suite_id.into(),
            status: RunStatus::Running,
            start_time: Utc::now(),
            end_time: None,
            results: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    /// 追加一个结果并重算摘要
    pub fn push_result(&mut self, result: TestResult) {
        self.results.push(result);
        self.summary = RunSummary::from_results(&self.results);
    }

    /// 收尾：有失败则整次执行标记为 Failed
    pub fn finish(&mut self) {
        self.status = if self.summary.failed > 0 {
            RunStatus::Failed
        } else {
            RunStatus::Completed
        };
        self.end_time = Some(Utc::now());
    }

    pub fn is_finished(&self) -> bool {
        self.status != RunStatus::Running
    }
}
