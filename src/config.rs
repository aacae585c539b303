use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::model::Environment;
use crate::variable::VariableResolver;
use crate::{Result, RusuiteError};

/// rusuite.toml 中的单个环境
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub base_url: String,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub variables: HashMap<String, String>,
}

/// 完整配置文件
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SuiteConfig {
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
}

impl SuiteConfig {
    /// 转换为环境实体，表名即 id；值里的 ${VAR} 在加载时解析
    ///
    /// 多个环境同时标记 active 时保留原样但打 warn（active 唯一性
    /// 由调用方维护，store 不强制）
    pub fn into_environments(self) -> Vec<Environment> {
        let active_count = self.environments.values().filter(|e| e.active).count();
        if active_count > 1 {
            warn!(
                count = active_count,
                "multiple environments marked active in config"
            );
        }

        // TOML 表无序，按名字排序保证确定性
        let mut entries: Vec<_> = self.environments.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        entries
            .into_iter()
            .map(|(name, config)| {
                let mut env = Environment::new(
                    name.clone(),
                    name,
                    VariableResolver::resolve_env_vars(&config.base_url),
                );
                env.active = config.active;
                env.headers = config
                    .headers
                    .into_iter()
                    .map(|(k, v)| (k, VariableResolver::resolve_env_vars(&v)))
                    .collect();
                env.variables = config
                    .variables
                    .into_iter()
                    .map(|(k, v)| (k, VariableResolver::resolve_env_vars(&v)))
                    .collect();
                env
            })
            .collect()
    }
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "rusuite.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<SuiteConfig> {
        let content = fs::read_to_string(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| RusuiteError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及父目录递归
    /// 2. 用户配置目录 ~/.config/rusuite/
    pub fn find_and_load() -> Option<SuiteConfig> {
        if let Some(config) = Self::try_load_from_current_dir() {
            return Some(config);
        }

        if let Some(config) = Self::try_load_from_user_dir() {
            return Some(config);
        }

        None
    }

    fn try_load_from_current_dir() -> Option<SuiteConfig> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_from_path(&config_path).ok();
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    fn try_load_from_user_dir() -> Option<SuiteConfig> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("rusuite").join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_from_path(&config_path).ok()
        } else {
            None
        }
    }
}
