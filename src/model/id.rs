use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// ID 生成器
///
/// 默认使用 UUID v4。原始调用方用毫秒时间戳生成 ID，同一毫秒内
/// 连续创建会碰撞，这里改用 UUID（行为差异见 DESIGN.md）。
/// 测试中需要确定性 ID 时使用 sequential 模式。
#[derive(Debug)]
pub struct IdGen {
    counter: Option<AtomicU64>,
}

impl IdGen {
    pub fn uuid() -> Self {
        Self { counter: None }
    }

    /// 单调递增计数器模式，产出 "1", "2", ...
    pub fn sequential() -> Self {
        Self {
            counter: Some(AtomicU64::new(0)),
        }
    }

    pub fn next(&self) -> String {
        match &self.counter {
            Some(counter) => (counter.fetch_add(1, Ordering::Relaxed) + 1).to_string(),
            None => Uuid::new_v4().to_string(),
        }
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids_are_monotonic() {
        let ids = IdGen::sequential();
        assert_eq!(ids.next(), "1");
        assert_eq!(ids.next(), "2");
        assert_eq!(ids.next(), "3");
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let ids = IdGen::uuid();
        let generated: HashSet<String> = (0..100).map(|_| ids.next()).collect();
        assert_eq!(generated.len(), 100);
    }
}
