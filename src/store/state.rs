use std::sync::Arc;

use crate::model::{Environment, TestRun, TestSuite};

/// 应用状态快照
///
/// clone 是浅拷贝：集合都在 Arc 里，快照之间共享未变更的部分。
/// 变更只能通过 reducer::transition 产生新快照。
#[derive(Debug, Clone)]
pub struct AppState {
    pub test_suites: Arc<Vec<TestSuite>>,

    /// 进行中的执行（最多一个）
    pub current_test_run: Option<Arc<TestRun>>,

    pub environments: Arc<Vec<Environment>>,

    /// 当前选中环境的 ID（选中关系由调用方维护，store 不强制唯一 active）
    pub selected_environment: Option<String>,

    pub is_loading: bool,

    pub error: Option<String>,
}

impl AppState {
    /// 全空状态
    pub fn new() -> Self {
        Self {
            test_suites: Arc::new(Vec::new()),
            current_test_run: None,
            environments: Arc::new(Vec::new()),
            selected_environment: None,
            is_loading: false,
            error: None,
        }
    }

    /// 初始状态：内置 dev/staging 两个示例环境，默认选中 dev
    pub fn seeded() -> Self {
        let dev = Environment::new("dev", "Development", "http://localhost:3000").active();
        let staging = Environment::new("staging", "Staging", "https://staging.example.com");

        Self {
            environments: Arc::new(vec![dev, staging]),
            selected_environment: Some("dev".to_string()),
            ..Self::new()
        }
    }

    pub fn suite(&self, id: &str) -> Option<&TestSuite> {
        self.test_suites.iter().find(|s| s.id == id)
    }

    pub fn environment(&self, id: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.id == id)
    }

    /// 当前选中的环境（ID 失配时为 None）
    pub fn current_environment(&self) -> Option<&Environment> {
        self.selected_environment
            .as_deref()
            .and_then(|id| self.environment(id))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
