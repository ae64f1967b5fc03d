use std::collections::VecDeque;

use bevy::prelude::*;
use smallvec::SmallVec;

#[cfg(feature = "history")]
use crate::history::StateHistory;
use crate::{
    error::StateTreeError,
    state::{StateContext, TransitionRequest},
    state_tree::{StateId, StateNode, StateTree},
};

/// 激活链, 从顶层状态到最深的叶子
pub type ActivePath = SmallVec<[StateId; 8]>;

#[derive(Clone, Copy)]
enum Hook {
    Enter,
    Step(f32),
    Exit,
}

/// 角色状态机
///
/// Root controller of a [`StateTree`]. Exactly one top-level state is active
/// at any time, and every active state has at most one active sub state, so
/// the active states always form one chain from the root to a leaf.
///
/// ```
/// # use bevy_gameplay_fsm::prelude::*;
/// #[derive(Default)]
/// struct Counter(u32);
///
/// struct Count;
/// impl ActorState<Counter> for Count {
///     fn step(&mut self, ctx: &mut StateContext<'_, Counter>, _delta: f32) {
///         ctx.actor_mut().0 += 1;
///     }
/// }
///
/// let mut tree = StateTree::new();
/// tree.add_root("count", Count).unwrap();
/// let mut machine = ActorStateMachine::attach(tree, Counter::default()).unwrap();
/// machine.step(0.016);
/// machine.step(0.016);
/// assert_eq!(machine.actor().0, 2);
/// ```
pub struct ActorStateMachine<A> {
    tree: StateTree<A>,
    actor: A,
    /// 当前激活的顶层状态
    active: Option<StateId>,
    pending: VecDeque<TransitionRequest>,
    #[cfg(feature = "history")]
    history: StateHistory,
}

impl<A: 'static> ActorStateMachine<A> {
    /// 绑定状态树, 进入第一个顶层状态
    ///
    /// Bind to `tree` and enter its first declared top-level state.
    pub fn attach(tree: StateTree<A>, actor: A) -> Result<Self, StateTreeError> {
        let Some(first) = tree.roots().first().copied() else {
            return Err(StateTreeError::NoStates);
        };
        let mut machine = Self {
            tree,
            actor,
            active: None,
            pending: VecDeque::new(),
            #[cfg(feature = "history")]
            history: StateHistory::default(),
        };
        debug!(
            "Attaching actor state machine with {} states, entering `{}`",
            machine.tree.len(),
            machine.tree.node(first).name
        );
        machine.activate_top_level(first);
        machine.flush_requests();
        Ok(machine)
    }

    /// 设置历史记录长度, 保留当前状态
    #[cfg(feature = "history")]
    pub fn with_history_len(mut self, len: usize) -> Self {
        let mut history = StateHistory::new(len);
        if let Some(current) = self.history.current() {
            history.push(current);
        }
        self.history = history;
        self
    }

    #[cfg(feature = "history")]
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// 上一个顶层状态, 用于"返回"类的转换
    #[cfg(feature = "history")]
    pub fn previous_state(&self) -> Option<StateId> {
        self.history.previous()
    }

    /// 推进一帧
    ///
    /// Forward one tick to the active top-level state.
    pub fn step(&mut self, delta: f32) {
        let Some(top) = self.active else {
            return;
        };
        self.step_state(top, delta);
    }

    /// 切换顶层状态, 名称无法解析时退回第一个顶层状态
    ///
    /// Switch the top-level state. An unknown name falls back to the first
    /// top-level state with a warning; use [`Self::try_transition_to`] to
    /// reject it instead.
    pub fn transition_to(&mut self, name: &str) {
        self.change_top_level(name);
        self.flush_requests();
    }

    pub fn try_transition_to(&mut self, name: &str) -> Result<(), StateTreeError> {
        if self.tree.get_id(None, name).is_none() {
            return Err(StateTreeError::UnknownState {
                name: name.to_string(),
            });
        }
        self.transition_to(name);
        Ok(())
    }

    pub fn actor(&self) -> &A {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut A {
        &mut self.actor
    }

    pub fn tree(&self) -> &StateTree<A> {
        &self.tree
    }

    pub fn active_state(&self) -> Option<StateId> {
        self.active
    }

    /// 当前激活链, 从顶层到叶子
    pub fn active_path(&self) -> ActivePath {
        let mut path = ActivePath::new();
        let mut next = self.active;
        while let Some(state) = next {
            path.push(state);
            next = self.tree.node(state).active_sub_state;
        }
        path
    }

    /// 激活链中的名称, 便于调试和断言
    pub fn active_names(&self) -> Vec<&str> {
        self.active_path()
            .into_iter()
            .map(|state| self.tree.node(state).name.as_str())
            .collect()
    }

    pub fn active_leaf(&self) -> Option<StateId> {
        self.active_path().last().copied()
    }

    pub fn is_active(&self, state: StateId) -> bool {
        if !self.tree.contains(state) {
            return false;
        }
        // 状态激活 <=> 其所有祖先都把它所在的分支作为激活子状态
        let mut child = state;
        for parent in self.tree.path_iter(state) {
            if self.tree.node(parent).active_sub_state != Some(child) {
                return false;
            }
            child = parent;
        }
        self.active == Some(child)
    }

    fn step_state(&mut self, state: StateId, delta: f32) {
        self.tree.node_mut(state).canceled = false;
        self.call_hook(state, Hook::Step(delta));
        self.flush_requests();

        if !self.is_active(state) {
            return;
        }
        let node = self.tree.node(state);
        if node.canceled {
            trace!("`{}` canceled its sub state step", node.name);
            return;
        }
        if let Some(sub_state) = node.active_sub_state {
            self.step_state(sub_state, delta);
        }
    }

    fn call_hook(&mut self, state: StateId, hook: Hook) {
        let Self {
            tree,
            actor,
            pending,
            ..
        } = self;
        let StateNode {
            state: behaviour,
            canceled,
            ..
        } = tree.node_mut(state);
        let mut ctx = StateContext::new(actor, state, canceled, pending);
        match hook {
            Hook::Enter => behaviour.enter(&mut ctx),
            Hook::Step(delta) => behaviour.step(&mut ctx, delta),
            Hook::Exit => behaviour.exit(&mut ctx),
        }
    }

    /// 先进入自身, 再进入(可能被覆盖的)子状态
    fn enter_state(&mut self, state: StateId) {
        self.call_hook(state, Hook::Enter);

        let selected = self.take_entry_override(state);
        let Some(first) = self.tree.node(state).sub_states.first().copied() else {
            return;
        };
        let sub_state = selected.unwrap_or(first);
        self.tree.node_mut(state).active_sub_state = Some(sub_state);
        self.enter_state(sub_state);
    }

    /// 先退出子状态, 再退出自身
    fn exit_state(&mut self, state: StateId) {
        if let Some(sub_state) = self.tree.node_mut(state).active_sub_state.take() {
            self.exit_state(sub_state);
        }
        self.call_hook(state, Hook::Exit);
    }

    /// 状态在自己的 `enter` 中请求的 depth 0 转换, 用于替代默认的第一个子状态
    fn take_entry_override(&mut self, state: StateId) -> Option<StateId> {
        let mut selected = None;
        let mut index = 0;
        while index < self.pending.len() {
            let request = &self.pending[index];
            if request.from == state && self.resolve_level(state, request.depth) == Some(state) {
                if let Some(request) = self.pending.remove(index) {
                    selected = self.resolve_sub_state(Some(state), &request.name);
                }
            } else {
                index += 1;
            }
        }
        selected
    }

    /// 向上委托 `depth` 层, `None` 表示到达根
    fn resolve_level(&self, from: StateId, depth: i32) -> Option<StateId> {
        let mut level = Some(from);
        let mut depth = depth;
        while let Some(state) = level {
            if depth == 0 {
                break;
            }
            level = self.tree.get_super_state(state);
            depth = depth.saturating_sub(1);
        }
        level
    }

    /// 在 `parent` 的子状态中解析名称, 失败时退回第一个子状态
    fn resolve_sub_state(&self, parent: Option<StateId>, name: &str) -> Option<StateId> {
        let siblings = self.tree.siblings(parent);
        let first = siblings.first().copied()?;
        match self.tree.get_id(parent, name) {
            Some(state) => Some(state),
            None => {
                warn!(
                    "No state named `{}` under {}, falling back to `{}`",
                    name,
                    parent.map_or("root", |parent| self.tree.node(parent).name.as_str()),
                    self.tree.node(first).name
                );
                Some(first)
            }
        }
    }

    fn flush_requests(&mut self) {
        while let Some(request) = self.pending.pop_front() {
            self.apply_request(request);
        }
    }

    fn apply_request(&mut self, request: TransitionRequest) {
        match self.resolve_level(request.from, request.depth) {
            None => self.change_top_level(&request.name),
            Some(level) if self.is_active(level) => self.change_sub_state(level, &request.name),
            Some(level) => {
                debug!(
                    "Dropping transition to `{}`: `{}` is no longer active",
                    request.name,
                    self.tree.node(level).name
                );
            }
        }
    }

    fn change_sub_state(&mut self, parent: StateId, name: &str) {
        let Some(target) = self.resolve_sub_state(Some(parent), name) else {
            warn!(
                "`{}` has no sub states, ignoring transition to `{}`",
                self.tree.node(parent).name,
                name
            );
            return;
        };
        debug!(
            "`{}`: sub state -> `{}`",
            self.tree.node(parent).name,
            self.tree.node(target).name
        );
        if let Some(old) = self.tree.node_mut(parent).active_sub_state.take() {
            self.exit_state(old);
        }
        self.tree.node_mut(parent).active_sub_state = Some(target);
        self.enter_state(target);
    }

    fn change_top_level(&mut self, name: &str) {
        let Some(target) = self.resolve_sub_state(None, name) else {
            return;
        };
        debug!("Top-level state -> `{}`", self.tree.node(target).name);
        if let Some(old) = self.active.take() {
            self.exit_state(old);
        }
        self.activate_top_level(target);
    }

    fn activate_top_level(&mut self, state: StateId) {
        self.active = Some(state);
        #[cfg(feature = "history")]
        self.history.push(state);
        self.enter_state(state);
    }
}

impl<A: std::fmt::Debug + 'static> std::fmt::Debug for ActorStateMachine<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorStateMachine")
            .field("actor", &self.actor)
            .field("active_path", &self.active_names())
            .field("pending", &self.pending)
            .finish()
    }
}
