use std::sync::Arc;

use rusuite::model::{Environment, RunSummary, TestRun, TestSuite};
use rusuite::store::{Action, AppState, transition};

fn suite(id: &str, name: &str) -> TestSuite {
    TestSuite::new(id, name, "")
}

/// 纯函数性：transition 不改输入，未触碰的子树按引用共享
#[test]
fn test_transition_never_mutates_input() {
    let state = transition(&AppState::seeded(), &Action::AddTestSuite(suite("1", "Auth")));
    let suites_before = Arc::clone(&state.test_suites);
    let envs_before = Arc::clone(&state.environments);

    let actions = [
        Action::SetLoading(true),
        Action::SetError(Some("x".to_string())),
        Action::SetSelectedEnvironment(Some("staging".to_string())),
        Action::SetCurrentTestRun(Some(TestRun::started("r1", "1"))),
    ];

    for action in &actions {
        let _ = transition(&state, action);
    }

    // 输入状态完全未变
    assert!(Arc::ptr_eq(&state.test_suites, &suites_before));
    assert!(Arc::ptr_eq(&state.environments, &envs_before));
    assert!(!state.is_loading);
    assert!(state.error.is_none());
    assert!(state.current_test_run.is_none());
    assert_eq!(state.selected_environment.as_deref(), Some("dev"));
}

#[test]
fn test_untouched_subtrees_keep_reference_equality() {
    let state = transition(&AppState::seeded(), &Action::AddTestSuite(suite("1", "Auth")));

    // 套件操作不碰环境
    let next = transition(&state, &Action::AddTestSuite(suite("2", "Users")));
    assert!(Arc::ptr_eq(&state.environments, &next.environments));
    assert!(!Arc::ptr_eq(&state.test_suites, &next.test_suites));

    // 环境操作不碰套件
    let next = transition(&state, &Action::DeleteEnvironment("staging".to_string()));
    assert!(Arc::ptr_eq(&state.test_suites, &next.test_suites));
}

/// add 后用同一个值 update，集合应与 add 后一致
#[test]
fn test_add_then_same_update_is_idempotent() {
    let base = AppState::new();
    let x = suite("1", "Auth");

    let added = transition(&base, &Action::AddTestSuite(x.clone()));
    let updated = transition(&added, &Action::UpdateTestSuite(x));

    assert_eq!(*updated.test_suites, *added.test_suites);
}

/// delete 对任意状态成立：结果中不存在该 id
#[test]
fn test_delete_is_total() {
    let empty = AppState::new();
    let deleted = transition(&empty, &Action::DeleteTestSuite("1".to_string()));
    assert!(deleted.test_suites.iter().all(|s| s.id != "1"));

    let with_suite = transition(&empty, &Action::AddTestSuite(suite("1", "Auth")));
    let deleted = transition(&with_suite, &Action::DeleteTestSuite("1".to_string()));
    assert!(deleted.test_suites.iter().all(|s| s.id != "1"));
}

#[test]
fn test_add_appends_in_order() {
    let mut state = AppState::new();
    for i in 1..=5 {
        state = transition(&state, &Action::AddTestSuite(suite(&i.to_string(), "s")));
        assert_eq!(state.test_suites.last().unwrap().id, i.to_string());
    }
    let ids: Vec<_> = state.test_suites.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3", "4", "5"]);
}

/// store 不干预 TestRun 的摘要，原样保存
#[test]
fn test_run_summary_passes_through() {
    let mut run = TestRun::started("r1", "s1");
    run.summary = RunSummary {
        total: 4,
        passed: 2,
        failed: 1,
        skipped: 1,
    };

    let state = transition(&AppState::new(), &Action::SetCurrentTestRun(Some(run.clone())));
    let stored = state.current_test_run.as_ref().unwrap();
    assert_eq!(stored.summary, run.summary);
    assert_eq!(
        stored.summary.total,
        stored.summary.passed + stored.summary.failed + stored.summary.skipped
    );
}

/// 场景 1：切换选中环境不动环境集合
#[test]
fn test_scenario_select_staging() {
    let state = AppState::seeded();
    let environments_before: Vec<Environment> = state.environments.as_ref().clone();

    let next = transition(
        &state,
        &Action::SetSelectedEnvironment(Some("staging".to_string())),
    );

    assert_eq!(next.selected_environment.as_deref(), Some("staging"));
    assert_eq!(*next.environments, environments_before);
}

/// 场景 2：add 再 delete 回到空集合
#[test]
fn test_scenario_add_then_delete_is_empty() {
    let state = AppState::new();
    let added = transition(&state, &Action::AddTestSuite(suite("1", "Auth")));
    let deleted = transition(&added, &Action::DeleteTestSuite("1".to_string()));
    assert!(deleted.test_suites.is_empty());
}

/// 场景 3：update 未命中不是 upsert
#[test]
fn test_scenario_update_ghost_changes_nothing() {
    let state = transition(&AppState::new(), &Action::AddTestSuite(suite("1", "Auth")));
    let next = transition(&state, &Action::UpdateTestSuite(suite("999", "ghost")));

    assert_eq!(next.test_suites.len(), 1);
    assert_eq!(*next.test_suites, *state.test_suites);
}

/// 同一 (state, action) 两次求值结果一致
#[test]
fn test_transition_is_deterministic() {
    let state = transition(&AppState::seeded(), &Action::AddTestSuite(suite("1", "Auth")));
    let action = Action::DeleteEnvironment("dev".to_string());

    let a = transition(&state, &action);
    let b = transition(&state, &action);

    assert_eq!(*a.environments, *b.environments);
    assert_eq!(*a.test_suites, *b.test_suites);
    assert_eq!(a.selected_environment, b.selected_environment);
}
