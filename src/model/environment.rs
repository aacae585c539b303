use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 环境配置 - base URL、默认 Header 与替换变量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// 唯一 ID
    pub id: String,

    pub name: String,

    pub base_url: String,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// {{name}} 替换用的变量表
    #[serde(default)]
    pub variables: HashMap<String, String>,

    #[serde(default)]
    pub active: bool,
}

impl Environment {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_url: base_url.into(),
            headers: HashMap::new(),
            variables: HashMap::new(),
            active: false,
        }
    }

    pub fn active(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}
