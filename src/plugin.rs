use std::marker::PhantomData;

use bevy::{ecs::schedule::ScheduleLabel, prelude::*};

use crate::{
    state_machine::ActorStateMachine,
    weapon::{Weapon, WeaponEvent, WeaponInput},
};

/// 武器事件消息
///
/// A [`WeaponEvent`] together with the entity of the weapon that produced it
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct WeaponMessage {
    pub weapon: Entity,
    pub event: WeaponEvent,
}

/// 每帧推进所有 [`Weapon`] 组件
#[derive(Debug, Default)]
pub struct WeaponPlugin<S: ScheduleLabel = Update> {
    /// 推进武器的调度器
    schedule: S,
}

impl<S: ScheduleLabel> WeaponPlugin<S> {
    pub fn new(schedule: S) -> Self {
        Self { schedule }
    }
}

impl<S: ScheduleLabel + Clone> Plugin for WeaponPlugin<S> {
    fn build(&self, app: &mut App) {
        app.add_message::<WeaponMessage>();
        app.add_systems(self.schedule.clone(), tick_weapons);
    }
}

pub fn tick_weapons(
    time: Res<Time>,
    mut weapons: Query<(Entity, &mut Weapon, &WeaponInput)>,
    mut messages: MessageWriter<WeaponMessage>,
) {
    let delta = time.delta_secs();
    for (entity, mut weapon, input) in &mut weapons {
        for event in weapon.update(delta, input) {
            messages.write(WeaponMessage {
                weapon: entity,
                event,
            });
        }
    }
}

/// 角色状态机组件
#[derive(Component, Deref, DerefMut)]
pub struct ActorStates<A: Send + Sync + 'static>(pub ActorStateMachine<A>);

/// 每帧推进所有 [`ActorStates<A>`] 组件
pub struct ActorStatePlugin<A, S: ScheduleLabel = Update> {
    schedule: S,
    _marker: PhantomData<fn() -> A>,
}

impl<A, S: ScheduleLabel> ActorStatePlugin<A, S> {
    pub fn new(schedule: S) -> Self {
        Self {
            schedule,
            _marker: PhantomData,
        }
    }
}

impl<A, S: ScheduleLabel + Default> Default for ActorStatePlugin<A, S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<A: Send + Sync + 'static, S: ScheduleLabel + Clone> Plugin for ActorStatePlugin<A, S> {
    fn build(&self, app: &mut App) {
        app.add_systems(self.schedule.clone(), step_actor_states::<A>);
    }
}

pub fn step_actor_states<A: Send + Sync + 'static>(
    time: Res<Time>,
    mut query: Query<&mut ActorStates<A>>,
) {
    let delta = time.delta_secs();
    for mut states in &mut query {
        states.step(delta);
    }
}
