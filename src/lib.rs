//! # Bevy Gameplay FSM
//!
//! 两个互相独立的玩法状态机：分层角色状态机，以及武器的射击/换弹/瞄准状态机。
//!
//! ## 功能特性
//!
//! - 静态状态树, 每层同时只有一个激活的子状态
//! - 进入顺序由根到叶, 退出顺序由叶到根
//! - 可向上委托的状态转换, 以及取消本帧子状态更新
//! - 武器的射击模式、蓄力、换弹、瞄准和弹药池
//! -------------------------------------------------------
//! # Bevy Gameplay FSM
//!
//! Two independent gameplay state machines: a hierarchical actor state
//! machine, and a weapon fire/reload/scope controller.
//!
//! ## Features
//!
//! - Static state trees with exactly one active sub state per level
//! - Root-to-leaf entry and leaf-to-root exit ordering
//! - Transitions delegated up the tree, and per-tick sub state cancellation
//! - Weapon fire modes, charge/overcharge, reload cycles, scope and ammo pools

#[cfg(feature = "macros")]
pub extern crate bevy_gameplay_fsm_macros;

pub mod error;
#[cfg(feature = "history")]
pub mod history;
pub mod plugin;
pub mod state;
pub mod state_machine;
pub mod state_tree;
pub mod weapon;

pub mod prelude {
    #[cfg(feature = "history")]
    pub use crate::history::*;
    pub use crate::{
        error::*, plugin::*, state::*, state_machine::*, state_tree::*, weapon::*,
    };

    #[cfg(feature = "macros")]
    pub use crate::bevy_gameplay_fsm_macros::state_tree;
}
