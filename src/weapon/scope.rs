use bevy::prelude::*;

use crate::weapon::{ScopeMode, Weapon, WeaponEvent, WeaponEvents, WeaponInput};

/// 瞄准阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScopePhase {
    #[default]
    Unscoped,
    WarmingUp,
    Scoped,
    CoolingDown,
}

#[derive(Debug, Clone, Copy, Default)]
pub(super) struct ScopeState {
    pub phase: ScopePhase,
    /// 从完全进入瞄准到完全退出之间为 true
    pub scoped: bool,
    /// 进度, 范围 [0, 1]
    pub timer: f32,
    /// `Toggle` 模式的开关
    pub toggled: bool,
}

impl Weapon {
    /// 处理瞄准的进入和退出, 返回 true 表示本帧被瞄准过渡占用
    pub(super) fn update_scope(
        &mut self,
        delta: f32,
        input: &WeaponInput,
        events: &mut WeaponEvents,
    ) -> bool {
        // 蓄力时不允许切换瞄准
        if self.is_charging() {
            return false;
        }
        let wanted = match self.config.scope_mode {
            ScopeMode::Hold => input.scope_held,
            ScopeMode::Toggle => {
                if input.scope_pressed {
                    self.scope.toggled = !self.scope.toggled;
                }
                self.scope.toggled
            }
        };

        match (self.scope.scoped, wanted) {
            (false, true) => {
                self.scope_warm_up(delta, events);
                true
            }
            (true, false) => {
                self.scope_cool_down(delta, events);
                true
            }
            (false, false) if self.scope.timer > 0.0 => {
                self.scope_cool_down(delta, events);
                true
            }
            (true, true) if self.scope.timer < 1.0 => {
                self.scope_warm_up(delta, events);
                true
            }
            _ => false,
        }
    }

    fn scope_warm_up(&mut self, delta: f32, events: &mut WeaponEvents) {
        self.energy_reload_timer = self.config.energy_reload_delay;
        let duration = self.config.scope_warmup;
        self.scope.timer = if duration > 0.0 {
            (self.scope.timer + delta / duration).min(1.0)
        } else {
            1.0
        };
        if self.scope.timer < 1.0 {
            self.scope.phase = ScopePhase::WarmingUp;
            return;
        }
        self.scope.phase = ScopePhase::Scoped;
        if !self.scope.scoped {
            debug!("Scope engaged");
            self.scope.scoped = true;
            self.action_timer = self.config.post_scope_delay;
            events.push(WeaponEvent::ScopeStarted);
        }
    }

    fn scope_cool_down(&mut self, delta: f32, events: &mut WeaponEvents) {
        self.energy_reload_timer = self.config.energy_reload_delay;
        let duration = self.config.scope_cooldown;
        self.scope.timer = if duration > 0.0 {
            (self.scope.timer - delta / duration).max(0.0)
        } else {
            0.0
        };
        if self.scope.timer > 0.0 {
            self.scope.phase = ScopePhase::CoolingDown;
            return;
        }
        self.scope.phase = ScopePhase::Unscoped;
        if self.scope.scoped {
            debug!("Scope disengaged");
            self.scope.scoped = false;
            self.action_timer = self.config.post_scope_delay;
            events.push(WeaponEvent::ScopeStopped);
        }
    }
}
