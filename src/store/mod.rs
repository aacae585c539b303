/// 实体存储 - 应用状态快照与封闭的 action 协议
///
/// 状态只能通过 dispatch 变更；transition 是纯函数，未触碰的
/// 子集合在新旧快照间按引用共享
pub mod action;
pub mod handle;
pub mod reducer;
pub mod state;

pub use action::Action;
pub use handle::{ReferentialMiss, Store, StoreOptions, SubscriptionId};
pub use reducer::transition;
pub use state::AppState;
