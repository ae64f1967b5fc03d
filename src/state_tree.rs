use std::fmt::{Debug, Display};

use smallvec::SmallVec;

use crate::{error::StateTreeError, state::ActorState};

/// 状态在状态树中的索引
///
/// Index of a state inside its [`StateTree`]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateId(u32);

impl StateId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) type SubStateIds = SmallVec<[StateId; 4]>;

/// 状态树中的一个节点
///
/// 父节点只是一个不持有所有权的索引, 子节点按声明顺序保存
pub(crate) struct StateNode<A> {
    pub name: String,
    pub super_state: Option<StateId>,
    pub sub_states: SubStateIds,
    pub state: Box<dyn ActorState<A>>,
    /// 当前激活的子状态
    pub active_sub_state: Option<StateId>,
    /// 只在一次 step 中有效
    pub canceled: bool,
}

/// 静态状态树
///
/// Static tree of actor states stored as an arena. Top-level states have no
/// super state; every other node is owned by exactly one parent.
///
/// ```
/// # use bevy_gameplay_fsm::prelude::*;
/// struct Idle;
/// impl ActorState<()> for Idle {}
///
/// let mut tree = StateTree::<()>::new();
/// let grounded = tree.add_root("grounded", Idle).unwrap();
/// let idle = tree.add(grounded, "idle", Idle).unwrap();
/// assert_eq!(tree.get_super_state(idle), Some(grounded));
/// ```
pub struct StateTree<A> {
    nodes: Vec<StateNode<A>>,
    roots: SubStateIds,
}

impl<A> StateTree<A> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: SmallVec::new(),
        }
    }

    /// 添加一个顶层状态
    ///
    /// Add a top-level state
    pub fn add_root(
        &mut self,
        name: impl Into<String>,
        state: impl ActorState<A>,
    ) -> Result<StateId, StateTreeError> {
        let name = name.into();
        if self.get_id(None, &name).is_some() {
            return Err(StateTreeError::DuplicateName {
                parent: "root".to_string(),
                name,
            });
        }
        let id = self.push_node(None, name, Box::new(state));
        self.roots.push(id);
        Ok(id)
    }

    /// 给 `parent` 添加一个子状态, 名称在兄弟节点中必须唯一
    ///
    /// Add a sub state to `parent`; the name must be unique among its siblings
    pub fn add(
        &mut self,
        parent: StateId,
        name: impl Into<String>,
        state: impl ActorState<A>,
    ) -> Result<StateId, StateTreeError> {
        if !self.contains(parent) {
            return Err(StateTreeError::UnknownParent(parent));
        }
        let name = name.into();
        if self.get_id(Some(parent), &name).is_some() {
            return Err(StateTreeError::DuplicateName {
                parent: self.nodes[parent.index()].name.clone(),
                name,
            });
        }
        let id = self.push_node(Some(parent), name, Box::new(state));
        self.nodes[parent.index()].sub_states.push(id);
        Ok(id)
    }

    fn push_node(
        &mut self,
        super_state: Option<StateId>,
        name: String,
        state: Box<dyn ActorState<A>>,
    ) -> StateId {
        let id = StateId::new(self.nodes.len() as u32);
        self.nodes.push(StateNode {
            name,
            super_state,
            sub_states: SmallVec::new(),
            state,
            active_sub_state: None,
            canceled: false,
        });
        id
    }

    /// 在 `parent` 的子状态中按名称查找, `None` 表示顶层
    ///
    /// Look a name up among the sub states of `parent`, `None` meaning the top level
    pub fn get_id(&self, parent: Option<StateId>, name: &str) -> Option<StateId> {
        self.siblings(parent)
            .iter()
            .copied()
            .find(|id| self.nodes[id.index()].name == name)
    }

    /// 深度优先查找第一个同名状态
    pub fn find(&self, name: &str) -> Option<StateId> {
        let mut stack: Vec<StateId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            if node.name == name {
                return Some(id);
            }
            stack.extend(node.sub_states.iter().rev().copied());
        }
        None
    }

    pub fn name(&self, state: StateId) -> Option<&str> {
        self.nodes.get(state.index()).map(|node| node.name.as_str())
    }

    pub fn roots(&self) -> &[StateId] {
        self.roots.as_slice()
    }

    pub fn get_sub_states(&self, state: StateId) -> Option<&[StateId]> {
        self.nodes
            .get(state.index())
            .map(|node| node.sub_states.as_slice())
    }

    pub fn get_super_state(&self, state: StateId) -> Option<StateId> {
        self.nodes
            .get(state.index())
            .and_then(|node| node.super_state)
    }

    /// `parent` 的子状态, `None` 时返回顶层状态
    pub(crate) fn siblings(&self, parent: Option<StateId>) -> &[StateId] {
        match parent {
            Some(parent) => self
                .nodes
                .get(parent.index())
                .map_or(&[], |node| node.sub_states.as_slice()),
            None => self.roots.as_slice(),
        }
    }

    pub fn contains(&self, state: StateId) -> bool {
        state.index() < self.nodes.len()
    }

    /// 从target开始，迭代其所有父节点
    pub fn path_iter(&self, target: StateId) -> impl Iterator<Item = StateId> + '_ {
        std::iter::successors(self.get_super_state(target), |&parent| {
            self.get_super_state(parent)
        })
    }

    /// 顶层状态的深度为 0
    pub fn depth(&self, state: StateId) -> usize {
        self.path_iter(state).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node(&self, state: StateId) -> &StateNode<A> {
        &self.nodes[state.index()]
    }

    pub(crate) fn node_mut(&mut self, state: StateId) -> &mut StateNode<A> {
        &mut self.nodes[state.index()]
    }
}

impl<A> Default for StateTree<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> Debug for StateTree<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (index, node) in self.nodes.iter().enumerate() {
            map.entry(
                &StateId::new(index as u32),
                &format_args!(
                    "{}({}) super={:?} subs={:?}",
                    node.name,
                    node.state.name_hint(),
                    node.super_state,
                    node.sub_states.as_slice()
                ),
            );
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Empty;

    impl ActorState<()> for Empty {}

    fn tree() -> (StateTree<()>, Vec<StateId>) {
        let mut tree = StateTree::new();
        let a = tree.add_root("a", Empty).unwrap();
        let b = tree.add_root("b", Empty).unwrap();
        let a1 = tree.add(a, "a1", Empty).unwrap();
        let a2 = tree.add(a, "a2", Empty).unwrap();
        let a11 = tree.add(a1, "leaf", Empty).unwrap();
        let b1 = tree.add(b, "leaf", Empty).unwrap();
        (tree, vec![a, b, a1, a2, a11, b1])
    }

    #[test]
    fn test_state_tree() {
        let (tree, v) = tree();
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.roots(), [v[0], v[1]].as_slice());
        assert_eq!(tree.get_sub_states(v[0]), Some([v[2], v[3]].as_slice()));
        assert_eq!(tree.get_sub_states(v[4]), Some([].as_slice()));
        assert_eq!(tree.get_super_state(v[4]), Some(v[2]));
        assert_eq!(tree.get_super_state(v[0]), None);
        assert_eq!(tree.name(v[3]), Some("a2"));
        assert_eq!(tree.name(StateId::new(42)), None);
    }

    #[test]
    fn test_duplicate_sibling_names() {
        let (mut tree, v) = tree();
        assert_eq!(
            tree.add(v[0], "a1", Empty),
            Err(StateTreeError::DuplicateName {
                parent: "a".to_string(),
                name: "a1".to_string()
            })
        );
        assert!(matches!(
            tree.add_root("b", Empty),
            Err(StateTreeError::DuplicateName { .. })
        ));
        // 不同父节点下可以同名
        assert!(tree.add(v[3], "leaf", Empty).is_ok());
        assert_eq!(
            tree.add(StateId::new(99), "x", Empty),
            Err(StateTreeError::UnknownParent(StateId::new(99)))
        );
    }

    #[test]
    fn test_lookup() {
        let (tree, v) = tree();
        assert_eq!(tree.get_id(None, "b"), Some(v[1]));
        assert_eq!(tree.get_id(Some(v[1]), "leaf"), Some(v[5]));
        assert_eq!(tree.get_id(Some(v[1]), "a1"), None);
        assert_eq!(tree.find("leaf"), Some(v[4]));
        assert_eq!(tree.find("missing"), None);
    }

    #[test]
    fn test_path_iter() {
        let (tree, v) = tree();
        assert_eq!(tree.path_iter(v[4]).collect::<Vec<_>>(), vec![v[2], v[0]]);
        assert_eq!(tree.depth(v[4]), 2);
        assert_eq!(tree.depth(v[1]), 0);
    }
}
