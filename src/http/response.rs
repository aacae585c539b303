use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Result;

/// 响应快照
///
/// 与执行结果一起持久化，所以用 String/HashMap 而不是 reqwest 的类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    pub status: u16,

    pub headers: HashMap<String, String>,

    pub body: String,

    /// 网络耗时（毫秒）
    pub duration_ms: u64,
}

impl ResponseSnapshot {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// 按名字取 Header（大小写不敏感）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// 将 body 解析为 JSON
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
