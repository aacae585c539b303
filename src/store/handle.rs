use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use tracing::{debug, warn};

use crate::store::action::Action;
use crate::store::reducer::transition;
use crate::store::state::AppState;

/// 订阅句柄，unsubscribe 时使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// UPDATE/DELETE 未命中 id 的诊断记录
///
/// transition 层面仍然是静默无操作；strict 模式的 Store 额外把
/// 未命中记下来，供需要严格校验的调用方 take_misses 排查
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferentialMiss {
    pub action: &'static str,
    pub id: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// 记录 referential miss（默认关闭，只打 warn 日志）
    pub strict: bool,
}

type Subscriber = Box<dyn Fn(&AppState) + Send + Sync>;

/// 实体存储句柄
///
/// 显式构造、按引用传递给需要它的协作方，不做进程级单例。
/// 写入路径只有 dispatch 一条；读取方随时 snapshot。并发 dispatch
/// 由内部锁串行化，两次 transition 不会交错。
pub struct Store {
    state: RwLock<AppState>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
    misses: Mutex<Vec<ReferentialMiss>>,
    strict: bool,
    closed: AtomicBool,
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        Self::with_options(initial, StoreOptions::default())
    }

    pub fn with_options(initial: AppState, options: StoreOptions) -> Self {
        Self {
            state: RwLock::new(initial),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
            misses: Mutex::new(Vec::new()),
            strict: options.strict,
            closed: AtomicBool::new(false),
        }
    }

    /// 当前快照（浅拷贝，集合按 Arc 共享）
    pub fn snapshot(&self) -> AppState {
        self.state.read().expect("store lock poisoned").clone()
    }

    /// 应用一个 action，返回新快照
    ///
    /// close 之后的 dispatch 是无操作，返回关闭时的快照
    pub fn dispatch(&self, action: Action) -> AppState {
        if self.closed.load(Ordering::SeqCst) {
            warn!(action = action.name(), "dispatch after close ignored");
            return self.snapshot();
        }

        let next = {
            let mut state = self.state.write().expect("store lock poisoned");

            if let Some(miss) = referential_miss(&state, &action) {
                warn!(action = miss.action, id = %miss.id, "no entity with matching id");
                if self.strict {
                    self.misses.lock().expect("miss lock poisoned").push(miss);
                }
            }

            debug!(action = action.name(), "dispatch");
            let next = transition(&state, &action);
            *state = next.clone();
            next
        };

        self.notify(&next);
        next
    }

    /// 注册观察者，每次 dispatch 后收到新快照
    pub fn subscribe(&self, subscriber: impl Fn(&AppState) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .retain(|(sub_id, _)| *sub_id != id);
    }

    /// 取走 strict 模式下积累的未命中记录
    pub fn take_misses(&self) -> Vec<ReferentialMiss> {
        std::mem::take(&mut *self.misses.lock().expect("miss lock poisoned"))
    }

    /// 拆除：丢弃所有观察者，后续 dispatch 变为无操作
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn notify(&self, state: &AppState) {
        let subscribers = self.subscribers.lock().expect("subscriber lock poisoned");
        for (_, subscriber) in subscribers.iter() {
            subscriber(state);
        }
    }
}

fn referential_miss(state: &AppState, action: &Action) -> Option<ReferentialMiss> {
    let (name, id) = match action {
        Action::UpdateTestSuite(suite) => (action.name(), &suite.id),
        Action::DeleteTestSuite(id) => (action.name(), id),
        Action::UpdateEnvironment(env) => (action.name(), &env.id),
        Action::DeleteEnvironment(id) => (action.name(), id),
        _ => return None,
    };

    let exists = match action {
        Action::UpdateTestSuite(_) | Action::DeleteTestSuite(_) => {
            state.test_suites.iter().any(|s| &s.id == id)
        }
        _ => state.environments.iter().any(|e| &e.id == id),
    };

    if exists {
        None
    } else {
        Some(ReferentialMiss {
            action: name,
            id: id.clone(),
        })
    }
}
