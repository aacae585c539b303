use std::collections::HashMap;

use crate::Result;
use crate::http::Client;
use crate::model::{
    Environment, IdGen, ResultStatus, TestCase, TestResult, TestRun, TestStatus, TestSuite,
};
use crate::runner::evaluator::evaluate_assertion;
use crate::store::{Action, Store};
use crate::variable::VariableResolver;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunnerOptions {
    /// 首个失败后跳过剩余测试
    pub fail_fast: bool,
}

/// 套件执行器
///
/// 通过 store 的 action 协议汇报进度：开始时 SET_CURRENT_TEST_RUN，
/// 每个测试完成后和收尾时 UPDATE_TEST_RUN
pub struct SuiteRunner {
    client: Client,
    ids: IdGen,
    options: RunnerOptions,
}

impl SuiteRunner {
    pub fn new() -> Self {
        Self::with_options(RunnerOptions::default())
    }

    pub fn with_options(options: RunnerOptions) -> Self {
        Self {
            client: Client::new(),
            ids: IdGen::uuid(),
            options,
        }
    }

    /// 执行整个套件
    pub async fn run(
        &self,
        store: &Store,
        suite: &TestSuite,
        environment: Option<&Environment>,
    ) -> Result<TestRun> {
        let mut run = TestRun::started(self.ids.next(), suite.id.clone());
        store.dispatch(Action::SetCurrentTestRun(Some(run.clone())));

        let mut abort = false;
        for test in &suite.tests {
            let result = if abort {
                TestResult::skipped(test.id.clone())
            } else {
                self.execute_test(test, environment).await
            };

            if self.options.fail_fast && result.status == ResultStatus::Failed {
                abort = true;
            }

            run.push_result(result);
            store.dispatch(Action::UpdateTestRun(run.clone()));
        }

        run.finish();
        store.dispatch(Action::UpdateTestRun(run.clone()));
        Ok(run)
    }

    /// 执行单个测试用例
    async fn execute_test(&self, test: &TestCase, environment: Option<&Environment>) -> TestResult {
        let url = match build_url(test, environment) {
            Ok(url) => url,
            Err(message) => {
                return TestResult::failed(test.id.clone(), 0, None, Vec::new(), Some(message));
            }
        };
        let headers = merge_headers(test, environment);
        let body = render_body(test, environment);

        let start = std::time::Instant::now();
        match self.client.execute(test.method, &url, &headers, body).await {
            Ok(response) => {
                let assertions: Vec<_> = test
                    .assertions
                    .iter()
                    .map(|a| evaluate_assertion(a, &response))
                    .collect();

                let status_ok = response.status == test.expected_status;
                let failed_assertions = assertions.iter().filter(|a| !a.is_passed()).count();
                let duration_ms = response.duration_ms;

                if status_ok && failed_assertions == 0 {
                    TestResult::passed(test.id.clone(), duration_ms, response, assertions)
                } else {
                    let error = if !status_ok {
                        format!(
                            "Expected status {}, got {}",
                            test.expected_status, response.status
                        )
                    } else {
                        format!("{} assertion(s) failed", failed_assertions)
                    };
                    TestResult::failed(
                        test.id.clone(),
                        duration_ms,
                        Some(response),
                        assertions,
                        Some(error),
                    )
                }
            }
            Err(e) => TestResult::failed(
                test.id.clone(),
                start.elapsed().as_millis() as u64,
                None,
                Vec::new(),
                Some(format!("Request failed: {}", e)),
            ),
        }
    }
}

impl Default for SuiteRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// 变量替换后的完整 URL
///
/// 相对路径拼接到环境的 base_url 上；没有环境时相对路径无法执行
fn build_url(test: &TestCase, environment: Option<&Environment>) -> std::result::Result<String, String> {
    let variables = environment.map(|e| &e.variables);
    let url = resolve(&test.url, variables);

    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(url);
    }

    match environment {
        Some(env) => {
            let base = resolve(&env.base_url, variables);
            Ok(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                url.trim_start_matches('/')
            ))
        }
        None => Err(format!(
            "Relative URL '{}' requires an environment with a base URL",
            test.url
        )),
    }
}

/// 环境 Header 在前，测试自身的 Header 覆盖同名项
fn merge_headers(test: &TestCase, environment: Option<&Environment>) -> HashMap<String, String> {
    let variables = environment.map(|e| &e.variables);
    let mut merged = HashMap::new();

    if let Some(env) = environment {
        for (key, value) in &env.headers {
            merged.insert(key.clone(), resolve(value, variables));
        }
    }
    for (key, value) in &test.headers {
        merged.insert(key.clone(), resolve(value, variables));
    }
    merged
}

/// body 序列化后做变量替换，作为原始字符串发送
fn render_body(test: &TestCase, environment: Option<&Environment>) -> Option<String> {
    let variables = environment.map(|e| &e.variables);
    test.body
        .as_ref()
        .map(|body| resolve(&body.to_string(), variables))
}

fn resolve(text: &str, variables: Option<&HashMap<String, String>>) -> String {
    match variables {
        Some(variables) => VariableResolver::resolve(text, variables),
        None => VariableResolver::resolve_env_vars(text),
    }
}

/// 将执行结果写回套件：测试状态、上次执行时间与耗时
///
/// 返回新套件值并刷新 updated_at，调用方负责 dispatch UPDATE_TEST_SUITE
pub fn apply_run_to_suite(suite: &TestSuite, run: &TestRun) -> TestSuite {
    let mut updated = suite.clone();
    for test in &mut updated.tests {
        if let Some(result) = run.results.iter().find(|r| r.test_id == test.id) {
            test.status = match result.status {
                ResultStatus::Passed => TestStatus::Passed,
                ResultStatus::Failed => TestStatus::Failed,
                ResultStatus::Skipped => TestStatus::Pending,
            };
            if result.status != ResultStatus::Skipped {
                test.last_run = run.end_time.or(Some(run.start_time));
                test.duration_ms = Some(result.duration_ms);
            }
        }
    }
    updated.touch();
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Method;

    fn env_with(base_url: &str) -> Environment {
        Environment::new("dev", "Development", base_url)
    }

    #[test]
    fn test_build_url_relative_joins_base() {
        let test = TestCase::new("t1", "users", Method::Get, "/api/users", 200);
        let env = env_with("http://localhost:3000/");
        assert_eq!(
            build_url(&test, Some(&env)).unwrap(),
            "http://localhost:3000/api/users"
        );
    }

    #[test]
    fn test_build_url_absolute_ignores_base() {
        let test = TestCase::new("t1", "ping", Method::Get, "https://other.example.com/ping", 200);
        let env = env_with("http://localhost:3000");
        assert_eq!(
            build_url(&test, Some(&env)).unwrap(),
            "https://other.example.com/ping"
        );
    }

    #[test]
    fn test_build_url_relative_without_environment_fails() {
        let test = TestCase::new("t1", "users", Method::Get, "/api/users", 200);
        assert!(build_url(&test, None).is_err());
    }

    #[test]
    fn test_build_url_substitutes_variables() {
        let test = TestCase::new("t1", "user", Method::Get, "/api/users/{{user_id}}", 200);
        let env = env_with("http://localhost:3000").with_variable("user_id", "42");
        assert_eq!(
            build_url(&test, Some(&env)).unwrap(),
            "http://localhost:3000/api/users/42"
        );
    }

    #[test]
    fn test_merge_headers_test_overrides_environment() {
        let test = TestCase::new("t1", "users", Method::Get, "/u", 200)
            .with_header("x-api-key", "test-key");
        let env = env_with("http://localhost")
            .with_header("x-api-key", "env-key")
            .with_header("accept", "application/json");

        let merged = merge_headers(&test, Some(&env));
        assert_eq!(merged.get("x-api-key"), Some(&"test-key".to_string()));
        assert_eq!(merged.get("accept"), Some(&"application/json".to_string()));
    }

    #[test]
    fn test_render_body_substitutes_variables() {
        let test = TestCase::new("t1", "login", Method::Post, "/login", 200)
            .with_body(serde_json::json!({"token": "{{token}}"}));
        let env = env_with("http://localhost").with_variable("token", "abc123");

        let body = render_body(&test, Some(&env)).unwrap();
        assert!(body.contains("abc123"));
    }

    #[test]
    fn test_apply_run_to_suite() {
        let suite = TestSuite::new("s1", "Auth", "")
            .with_test(TestCase::new("t1", "login", Method::Post, "/login", 200))
            .with_test(TestCase::new("t2", "me", Method::Get, "/me", 200));

        let mut run = TestRun::started("r1", "s1");
        run.push_result(TestResult::failed("t1", 30, None, Vec::new(), None));
        run.push_result(TestResult::skipped("t2"));
        run.finish();

        let updated = apply_run_to_suite(&suite, &run);
        assert_eq!(updated.tests[0].status, TestStatus::Failed);
        assert_eq!(updated.tests[0].duration_ms, Some(30));
        assert!(updated.tests[0].last_run.is_some());
        // 跳过的测试不记录耗时
        assert_eq!(updated.tests[1].status, TestStatus::Pending);
        assert!(updated.tests[1].duration_ms.is_none());
        assert!(updated.updated_at >= suite.updated_at);
    }
}
