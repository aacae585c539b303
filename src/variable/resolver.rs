use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static VAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}").unwrap());
static ENV_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// 变量替换器
pub struct VariableResolver;

impl VariableResolver {
    /// 替换文本中的所有 {{variable}} 占位符，未找到的保持原样
    pub fn substitute(text: &str, variables: &HashMap<String, String>) -> String {
        VAR_REGEX
            .replace_all(text, |caps: &Captures| {
                let name = &caps[1];
                variables
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .to_string()
    }

    /// 解析并替换系统环境变量 ${VAR}
    pub fn resolve_env_vars(text: &str) -> String {
        ENV_REGEX
            .replace_all(text, |caps: &Captures| {
                let name = &caps[1];
                std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
            })
            .to_string()
    }

    /// 完整流程：先解析系统环境变量，再替换自定义变量
    pub fn resolve(text: &str, variables: &HashMap<String, String>) -> String {
        let with_env = Self::resolve_env_vars(text);
        Self::substitute(&with_env, variables)
    }
}
