use crate::model::{Environment, TestRun, TestSuite};

/// 状态变更的封闭集合
///
/// 每个变体携带完整 payload；ID 由调用方生成（见 model::IdGen），
/// store 本身不产生 ID 也不读时钟
#[derive(Debug, Clone)]
pub enum Action {
    SetLoading(bool),
    SetError(Option<String>),

    /// 整体替换套件集合（批量加载）
    SetTestSuites(Vec<TestSuite>),
    /// 追加到末尾，插入顺序保留
    AddTestSuite(TestSuite),
    /// 按 id 替换，未命中时静默无操作
    UpdateTestSuite(TestSuite),
    /// 按 id 删除所有匹配项
    DeleteTestSuite(String),

    SetCurrentTestRun(Option<TestRun>),
    /// 无条件替换当前执行（不检查 id，与套件更新不对称）
    UpdateTestRun(TestRun),

    SetEnvironments(Vec<Environment>),
    SetSelectedEnvironment(Option<String>),
    AddEnvironment(Environment),
    /// 按 id 替换，未命中时静默无操作
    UpdateEnvironment(Environment),
    DeleteEnvironment(String),
}

impl Action {
    /// 动作名，用于日志与诊断
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetLoading(_) => "SET_LOADING",
            Action::SetError(_) => "SET_ERROR",
            Action::SetTestSuites(_) => "SET_TEST_SUITES",
            Action::AddTestSuite(_) => "ADD_TEST_SUITE",
            Action::UpdateTestSuite(_) => "UPDATE_TEST_SUITE",
            Action::DeleteTestSuite(_) => "DELETE_TEST_SUITE",
            Action::SetCurrentTestRun(_) => "SET_CURRENT_TEST_RUN",
            Action::UpdateTestRun(_) => "UPDATE_TEST_RUN",
            Action::SetEnvironments(_) => "SET_ENVIRONMENTS",
            Action::SetSelectedEnvironment(_) => "SET_SELECTED_ENVIRONMENT",
            Action::AddEnvironment(_) => "ADD_ENVIRONMENT",
            Action::UpdateEnvironment(_) => "UPDATE_ENVIRONMENT",
            Action::DeleteEnvironment(_) => "DELETE_ENVIRONMENT",
        }
    }
}
