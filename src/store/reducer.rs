use std::sync::Arc;

use crate::model::{Environment, TestSuite};
use crate::store::action::Action;
use crate::store::state::AppState;

/// 纯转移函数：`(state, action) -> state'`
///
/// 不修改输入、不读时钟、不产生随机数。未触碰的子集合在返回值里
/// 复用同一个 Arc。UPDATE/DELETE 未命中 id 时返回的快照与输入等值
/// （诊断由 Store 句柄负责，见 handle.rs）。
pub fn transition(state: &AppState, action: &Action) -> AppState {
    match action {
        Action::SetLoading(flag) => AppState {
            is_loading: *flag,
            ..state.clone()
        },

        Action::SetError(message) => AppState {
            error: message.clone(),
            ..state.clone()
        },

        Action::SetTestSuites(suites) => AppState {
            test_suites: Arc::new(suites.clone()),
            ..state.clone()
        },

        Action::AddTestSuite(suite) => {
            let mut suites = state.test_suites.as_ref().clone();
            suites.push(suite.clone());
            AppState {
                test_suites: Arc::new(suites),
                ..state.clone()
            }
        }

        Action::UpdateTestSuite(suite) => AppState {
            test_suites: replace_by_id(&state.test_suites, &suite.id, suite),
            ..state.clone()
        },

        Action::DeleteTestSuite(id) => AppState {
            test_suites: remove_by_id(&state.test_suites, id, |s: &TestSuite| &s.id),
            ..state.clone()
        },

        Action::SetCurrentTestRun(run) => AppState {
            current_test_run: run.clone().map(Arc::new),
            ..state.clone()
        },

        // 无条件替换，不比对 id
        Action::UpdateTestRun(run) => AppState {
            current_test_run: Some(Arc::new(run.clone())),
            ..state.clone()
        },

        Action::SetEnvironments(environments) => AppState {
            environments: Arc::new(environments.clone()),
            ..state.clone()
        },

        Action::SetSelectedEnvironment(id) => AppState {
            selected_environment: id.clone(),
            ..state.clone()
        },

        Action::AddEnvironment(environment) => {
            let mut environments = state.environments.as_ref().clone();
            environments.push(environment.clone());
            AppState {
                environments: Arc::new(environments),
                ..state.clone()
            }
        }

        Action::UpdateEnvironment(environment) => AppState {
            environments: replace_env_by_id(&state.environments, &environment.id, environment),
            ..state.clone()
        },

        Action::DeleteEnvironment(id) => AppState {
            environments: remove_by_id(&state.environments, id, |e: &Environment| &e.id),
            ..state.clone()
        },
    }
}

/// 未命中时返回原 Arc（保持引用共享）
fn replace_by_id(suites: &Arc<Vec<TestSuite>>, id: &str, value: &TestSuite) -> Arc<Vec<TestSuite>> {
    if !suites.iter().any(|s| s.id == id) {
        return Arc::clone(suites);
    }
    Arc::new(
        suites
            .iter()
            .map(|s| if s.id == id { value.clone() } else { s.clone() })
            .collect(),
    )
}

fn replace_env_by_id(
    environments: &Arc<Vec<Environment>>,
    id: &str,
    value: &Environment,
) -> Arc<Vec<Environment>> {
    if !environments.iter().any(|e| e.id == id) {
        return Arc::clone(environments);
    }
    Arc::new(
        environments
            .iter()
            .map(|e| if e.id == id { value.clone() } else { e.clone() })
            .collect(),
    )
}

fn remove_by_id<T: Clone>(
    items: &Arc<Vec<T>>,
    id: &str,
    key: impl Fn(&T) -> &String,
) -> Arc<Vec<T>> {
    if !items.iter().any(|item| key(item) == id) {
        return Arc::clone(items);
    }
    Arc::new(
        items
            .iter()
            .filter(|item| key(item) != id)
            .cloned()
            .collect(),
    )
}
