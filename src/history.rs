use std::collections::VecDeque;

use crate::state_tree::StateId;

/// 顶层状态的激活记录
///
/// Ring of the most recently activated top-level states. Older entries are
/// dropped once `capacity` is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateHistory {
    entries: VecDeque<StateId>,
    capacity: usize,
}

impl StateHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, state: StateId) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(state);
    }

    pub fn current(&self) -> Option<StateId> {
        self.entries.back().copied()
    }

    /// 当前状态之前激活的顶层状态
    pub fn previous(&self) -> Option<StateId> {
        self.entries.iter().nth_back(1).copied()
    }

    /// 从旧到新
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = StateId> + '_ {
        self.entries.iter().copied()
    }

    /// 只保留当前状态
    pub fn clear(&mut self) {
        let current = self.current();
        self.entries.clear();
        self.entries.extend(current);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new(10)
    }
}
