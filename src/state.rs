use std::{any::type_name, collections::VecDeque};

use crate::state_tree::StateId;

/// 角色状态的行为
///
/// Behaviour hooks of one node in a [`StateTree`](crate::state_tree::StateTree).
///
/// 生命周期\Lifecycle
/// * `enter` - 成为激活链的一部分时调用, 在子状态的 `enter` 之前
/// - `enter` - runs when the state joins the active chain, before its sub state enters
/// * `step` - 每帧调用, 在子状态的 `step` 之前
/// - `step` - runs every tick, before the active sub state steps
/// * `exit` - 离开激活链时调用, 在子状态的 `exit` 之后
/// - `exit` - runs when the state leaves the active chain, after its sub state exits
pub trait ActorState<A>: Send + Sync + 'static {
    fn enter(&mut self, _ctx: &mut StateContext<'_, A>) {}

    fn step(&mut self, _ctx: &mut StateContext<'_, A>, _delta: f32) {}

    fn exit(&mut self, _ctx: &mut StateContext<'_, A>) {}

    fn name_hint(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// 状态转换请求, 在发起的钩子返回后处理
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransitionRequest {
    pub from: StateId,
    pub name: String,
    pub depth: i32,
}

/// 状态上下文
///
/// StateContext
/// # 作用\Purpose
/// * 在钩子中访问角色, 请求状态转换, 或取消本帧子状态的更新
/// - Gives hooks access to the actor, transition requests and cancellation
pub struct StateContext<'a, A> {
    actor: &'a mut A,
    state: StateId,
    canceled: &'a mut bool,
    requests: &'a mut VecDeque<TransitionRequest>,
}

impl<'a, A> StateContext<'a, A> {
    pub(crate) fn new(
        actor: &'a mut A,
        state: StateId,
        canceled: &'a mut bool,
        requests: &'a mut VecDeque<TransitionRequest>,
    ) -> Self {
        Self {
            actor,
            state,
            canceled,
            requests,
        }
    }

    pub fn actor(&self) -> &A {
        self.actor
    }

    pub fn actor_mut(&mut self) -> &mut A {
        self.actor
    }

    /// 正在运行钩子的状态
    pub fn state(&self) -> StateId {
        self.state
    }

    /// 请求状态转换
    ///
    /// Request a transition once the running hook returns.
    /// * `depth == 0`: 切换本状态的子状态
    /// - `depth == 0`: switch this state's own sub state
    /// * `depth > 0`: 向上委托 `depth` 层后再切换
    /// - `depth > 0`: hand the request `depth` levels up before applying it
    /// * `depth < 0`: 一直委托到根, 切换顶层状态
    /// - `depth < 0`: climbs all the way up and switches the top-level state
    ///
    /// 名称无法解析时会退回到该层的第一个状态
    pub fn transition_to(&mut self, name: impl Into<String>, depth: i32) {
        self.requests.push_back(TransitionRequest {
            from: self.state,
            name: name.into(),
            depth,
        });
    }

    /// 取消本帧子状态的 `step`, 下一帧自动恢复
    ///
    /// Skip the active sub state's `step` for the rest of this tick
    pub fn cancel(&mut self) {
        *self.canceled = true;
    }

    pub fn is_canceled(&self) -> bool {
        *self.canceled
    }
}
