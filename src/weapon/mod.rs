//! 武器射击/换弹/瞄准状态机
//!
//! Weapon fire/reload/scope controller. The weapon is advanced once per frame
//! by [`Weapon::update`], which evaluates at most one action branch per tick in
//! strict priority order: reload in progress, reload trigger, scoped
//! (teardown or secondary fire), unscoped (engage or primary fire).

mod ammo;
mod config;
mod event;
mod reload;
mod scope;

pub use ammo::AmmoPool;
pub use config::{
    FireChannel, FireMode, FireParams, OverflowPolicy, ReloadMode, ScopeMode, WeaponConfig,
};
pub use event::{WeaponEvent, WeaponEvents};
pub use scope::ScopePhase;

use bevy::prelude::*;

/// 一帧的输入, 由游戏的输入层写入
///
/// Per-tick input: `*_pressed` are edges (true on the frame the button went
/// down), `*_held` are levels.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeaponInput {
    pub fire_pressed: bool,
    pub fire_held: bool,
    pub reload_pressed: bool,
    pub scope_pressed: bool,
    pub scope_held: bool,
}

impl WeaponInput {
    /// 刚按下射击(同时视为按住)
    pub fn fire_pressed() -> Self {
        Self {
            fire_pressed: true,
            fire_held: true,
            ..Self::default()
        }
    }

    pub fn fire_held() -> Self {
        Self {
            fire_held: true,
            ..Self::default()
        }
    }

    pub fn reload() -> Self {
        Self {
            reload_pressed: true,
            ..Self::default()
        }
    }

    pub fn scope_pressed() -> Self {
        Self {
            scope_pressed: true,
            scope_held: true,
            ..Self::default()
        }
    }

    pub fn scope_held() -> Self {
        Self {
            scope_held: true,
            ..Self::default()
        }
    }
}

/// 武器
#[derive(Component, Debug, Clone)]
#[require(WeaponInput)]
pub struct Weapon {
    config: WeaponConfig,
    ammo: AmmoPool,
    enabled: bool,
    /// 全局动作冷却, 大于 0 时跳过所有动作
    action_timer: f32,
    /// 大于 0 <=> 正在换弹
    reload_timer: f32,
    scope: scope::ScopeState,
    /// 大于 0 <=> 正在蓄力
    charge_time: f32,
    charge_ammo_consumed: i32,
    energy_reload_timer: f32,
}

impl Weapon {
    pub fn new(config: WeaponConfig) -> Self {
        let ammo = AmmoPool::new(config.clip_size, config.reserve_size);
        Self {
            config,
            ammo,
            enabled: true,
            action_timer: 0.0,
            reload_timer: 0.0,
            scope: scope::ScopeState::default(),
            charge_time: 0.0,
            charge_ammo_consumed: 0,
            energy_reload_timer: 0.0,
        }
    }

    /// 以指定弹药数量创建
    pub fn with_ammo(mut self, clip: i32, reserve: i32) -> Self {
        self.ammo.set(clip, reserve);
        self
    }

    /// 推进一帧
    ///
    /// Advance the weapon by `delta` seconds and return the events of this tick.
    pub fn update(&mut self, delta: f32, input: &WeaponInput) -> WeaponEvents {
        let mut events = WeaponEvents::new();
        let delta = delta.max(0.0);
        let before = (self.ammo.ammo(), self.ammo.reserve());

        if self.energy_reload_timer > 0.0 {
            self.energy_reload_timer = (self.energy_reload_timer - delta).max(0.0);
        }

        if self.action_timer > 0.0 {
            self.action_timer = (self.action_timer - delta).max(0.0);
        } else if self.enabled {
            self.process_actions(delta, input, &mut events);
        }

        let after = (self.ammo.ammo(), self.ammo.reserve());
        if after != before {
            events.push(WeaponEvent::AmmoChanged {
                ammo: after.0,
                reserve: after.1,
            });
        }
        events
    }

    fn process_actions(&mut self, delta: f32, input: &WeaponInput, events: &mut WeaponEvents) {
        if self.is_reloading() {
            self.advance_reload(delta, input, events);
        } else if self.wants_reload(input) {
            self.start_reload(events);
        } else if self.scope.scoped {
            if !self.update_scope(delta, input, events) {
                self.process_fire(FireChannel::Secondary, delta, input, events);
            }
        } else if !self.update_scope(delta, input, events) {
            self.process_fire(FireChannel::Primary, delta, input, events);
        }
    }

    fn is_triggered(&self, params: &FireParams, input: &WeaponInput) -> bool {
        let loaded = !self.ammo.clip_empty();
        match params.mode {
            FireMode::Automatic => input.fire_held && loaded,
            FireMode::SemiAutomatic => input.fire_pressed && loaded,
            FireMode::ChargeAndRelease => self.is_charging() || (input.fire_held && loaded),
            FireMode::Disabled => false,
        }
    }

    fn process_fire(
        &mut self,
        channel: FireChannel,
        delta: f32,
        input: &WeaponInput,
        events: &mut WeaponEvents,
    ) {
        let params = *self.config.channel(channel);
        if !self.is_triggered(&params, input) {
            return;
        }
        match params.mode {
            FireMode::Automatic | FireMode::SemiAutomatic => {
                if self.ammo.consume(params.ammo_cost, params.overflow) {
                    trace!("Weapon fired on {:?}", channel);
                    self.action_timer = params.cooldown();
                    self.energy_reload_timer = self.config.energy_reload_delay;
                    events.push(WeaponEvent::Fired { channel });
                }
            }
            FireMode::ChargeAndRelease => self.process_charge(channel, &params, delta, input, events),
            FireMode::Disabled => {}
        }
    }

    fn process_charge(
        &mut self,
        channel: FireChannel,
        params: &FireParams,
        delta: f32,
        input: &WeaponInput,
        events: &mut WeaponEvents,
    ) {
        let limit = params.max_charge + params.overcharge.max(0.0);
        let charging = self.charge_time <= limit
            && (input.fire_held || self.charge_time < params.min_charge);

        if charging {
            // 零时长的帧不会开始蓄力
            if delta <= 0.0 {
                return;
            }
            self.charge_time += delta;
            let owed = params.charge_ammo_target(self.charge_time) - self.charge_ammo_consumed;
            if owed > 0 {
                self.charge_ammo_consumed += self.consume_partial(owed, params.overflow);
            }
            self.energy_reload_timer = self.config.energy_reload_delay;
            trace!(
                "Charging {:?}: {:.3}s, {} ammo paid",
                channel, self.charge_time, self.charge_ammo_consumed
            );
            return;
        }

        let pct_time = params.charge_fraction(self.charge_time);
        let pct_ammo = if params.ammo_cost == 0 {
            1.0
        } else {
            self.charge_ammo_consumed as f32 / params.ammo_cost as f32
        };
        trace!(
            "Charged fire on {:?}: time {:.2}, ammo {:.2}",
            channel, pct_time, pct_ammo
        );
        self.action_timer = params.cooldown();
        self.charge_time = 0.0;
        self.charge_ammo_consumed = 0;
        events.push(WeaponEvent::ChargedFire {
            channel,
            pct_time,
            pct_ammo,
        });
    }

    /// 尽量支付 `amount`, 弹匣不足时只支付弹匣中剩余的部分
    fn consume_partial(&mut self, amount: i32, policy: OverflowPolicy) -> i32 {
        if self.ammo.consume(amount, policy) {
            return amount;
        }
        let available = self.ammo.ammo().min(amount);
        if available > 0 && self.ammo.consume(available, policy) {
            available
        } else {
            0
        }
    }

    /// 拾取弹药, 返回实际增加到备弹的数量
    pub fn replenish_ammo(&mut self, amount: i32) -> i32 {
        self.ammo.replenish(amount)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }

    pub fn ammo(&self) -> &AmmoPool {
        &self.ammo
    }

    pub fn action_timer(&self) -> f32 {
        self.action_timer
    }

    pub fn reload_timer(&self) -> f32 {
        self.reload_timer
    }

    pub fn charge_time(&self) -> f32 {
        self.charge_time
    }

    pub fn charge_ammo_consumed(&self) -> i32 {
        self.charge_ammo_consumed
    }

    pub fn energy_reload_timer(&self) -> f32 {
        self.energy_reload_timer
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_timer > 0.0
    }

    pub fn is_charging(&self) -> bool {
        self.charge_time > 0.0
    }

    pub fn is_scoped(&self) -> bool {
        self.scope.scoped
    }

    /// 瞄准进度, 0 为未瞄准, 1 为完全瞄准
    pub fn scope_progress(&self) -> f32 {
        self.scope.timer
    }

    pub fn scope_phase(&self) -> ScopePhase {
        self.scope.phase
    }
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new(WeaponConfig::default())
    }
}
