use std::fs;

use tempfile::TempDir;

use rusuite::config::ConfigLoader;
use rusuite::store::{Action, AppState, Store};

/// 从实际配置文件加载环境并灌入 store
#[test]
fn test_load_config_and_seed_store() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("rusuite.toml");

    let config_content = r#"
[environments.dev]
base_url = "http://localhost:3000"
active = true

[environments.dev.variables]
token = "dev-token"

[environments.staging]
base_url = "https://staging.example.com"

[environments.staging.headers]
x-api-key = "staging-key"
"#;
    fs::write(&config_path, config_content).unwrap();

    let config = ConfigLoader::load_from_path(&config_path).unwrap();
    let environments = config.into_environments();
    assert_eq!(environments.len(), 2);

    let store = Store::new(AppState::new());
    store.dispatch(Action::SetEnvironments(environments));

    let snapshot = store.snapshot();
    let dev = snapshot.environment("dev").unwrap();
    assert!(dev.active);
    assert_eq!(dev.base_url, "http://localhost:3000");
    assert_eq!(dev.variables.get("token"), Some(&"dev-token".to_string()));

    let staging = snapshot.environment("staging").unwrap();
    assert!(!staging.active);
    assert_eq!(
        staging.headers.get("x-api-key"),
        Some(&"staging-key".to_string())
    );
}

#[test]
fn test_system_env_vars_resolved_at_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("rusuite.toml");

    unsafe {
        std::env::set_var("RUSUITE_IT_BASE", "http://resolved.example.com");
    }

    fs::write(
        &config_path,
        r#"
[environments.dev]
base_url = "${RUSUITE_IT_BASE}"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_path(&config_path).unwrap();
    let environments = config.into_environments();
    assert_eq!(environments[0].base_url, "http://resolved.example.com");

    unsafe {
        std::env::remove_var("RUSUITE_IT_BASE");
    }
}

#[test]
fn test_invalid_toml_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("rusuite.toml");
    fs::write(&config_path, "[environments.dev\nbase_url = ").unwrap();

    let result = ConfigLoader::load_from_path(&config_path);
    assert!(result.is_err());
}

/// 多个 active 环境原样保留（唯一性由调用方负责）
#[test]
fn test_multiple_active_environments_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("rusuite.toml");

    fs::write(
        &config_path,
        r#"
[environments.a]
base_url = "http://a.example.com"
active = true

[environments.b]
base_url = "http://b.example.com"
active = true
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_path(&config_path).unwrap();
    let environments = config.into_environments();
    assert_eq!(environments.iter().filter(|e| e.active).count(), 2);
}
