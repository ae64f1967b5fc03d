use thiserror::Error;

use crate::state_tree::StateId;

/// 状态树的配置错误
///
/// Configuration errors of a state tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateTreeError {
    /// 没有任何顶层状态
    ///
    /// The tree has no top-level state to start in
    #[error("state tree has no states")]
    NoStates,
    /// 同一父状态下的名称重复
    ///
    /// A sibling with the same name already exists
    #[error("state `{name}` already exists under {parent}")]
    DuplicateName { parent: String, name: String },
    /// 父状态不在这棵树中
    ///
    /// The parent id does not belong to this tree
    #[error("state {0} is not part of the tree")]
    UnknownParent(StateId),
    /// 找不到转换目标
    ///
    /// No sibling with this name exists
    #[error("no state named `{name}` at the requested level")]
    UnknownState { name: String },
}
