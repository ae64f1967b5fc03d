use bevy::prelude::*;

use crate::weapon::{ReloadMode, Weapon, WeaponEvent, WeaponEvents, WeaponInput};

impl Weapon {
    /// 当前换弹策略是否要开始换弹
    pub(super) fn wants_reload(&self, input: &WeaponInput) -> bool {
        if self.is_charging() || !self.ammo.can_reload() {
            return false;
        }
        match self.config.reload_mode {
            ReloadMode::Energy => self.energy_reload_timer <= 0.0,
            _ => input.reload_pressed,
        }
    }

    pub(super) fn start_reload(&mut self, events: &mut WeaponEvents) {
        let mode = self.config.reload_mode;
        if mode.dumps_clip() {
            self.ammo.dump_clip();
        }
        // 换弹至少持续一帧
        self.reload_timer = (self.config.reload_time + self.config.reload_warmup).max(f32::EPSILON);
        debug!(
            "Reload started ({:?}), {:.2}s until the first refill",
            mode, self.reload_timer
        );
        events.push(WeaponEvent::ReloadStarted);
    }

    pub(super) fn advance_reload(
        &mut self,
        delta: f32,
        input: &WeaponInput,
        events: &mut WeaponEvents,
    ) {
        if input.fire_pressed && !self.ammo.clip_empty() {
            debug!("Reload interrupted by fire input");
            self.stop_reload(events);
            return;
        }

        self.reload_timer -= delta;
        if self.reload_timer > 0.0 {
            return;
        }

        if !self.config.reload_mode.is_partial() {
            self.ammo.refill(self.ammo.clip_size());
            events.push(WeaponEvent::ReloadOccurred);
            self.stop_reload(events);
            return;
        }

        let amount = self.config.reload_amount.max(1);
        loop {
            self.ammo.refill(amount);
            events.push(WeaponEvent::ReloadOccurred);
            if self.ammo.clip_full() || self.ammo.reserve_empty() {
                self.stop_reload(events);
                return;
            }
            self.reload_timer += self.config.reload_time;
            if self.reload_timer > 0.0 {
                return;
            }
        }
    }

    pub(super) fn stop_reload(&mut self, events: &mut WeaponEvents) {
        self.reload_timer = 0.0;
        self.action_timer = self.config.post_reload_delay;
        if self.config.reload_mode == ReloadMode::Energy {
            self.energy_reload_timer = self.config.energy_reload_delay;
        }
        debug!(
            "Reload stopped with {} in clip, {} in reserve",
            self.ammo.ammo(),
            self.ammo.reserve()
        );
        events.push(WeaponEvent::ReloadStopped);
    }
}

#[cfg(test)]
mod tests {
    use crate::weapon::*;

    #[test]
    fn test_full_clip_reload() {
        let mut weapon = Weapon::new(
            WeaponConfig::new(10, 100).with_reload(ReloadMode::FullClip, 1.0, 0.5),
        )
        .with_ammo(2, 50);

        let events = weapon.update(0.1, &WeaponInput::reload());
        assert_eq!(
            events.as_slice(),
            &[
                WeaponEvent::ReloadStarted,
                WeaponEvent::AmmoChanged {
                    ammo: 0,
                    reserve: 52
                }
            ]
        );
        assert!(weapon.is_reloading());
        assert_eq!(weapon.reload_timer(), 1.5);

        weapon.update(0.5, &WeaponInput::default());
        weapon.update(0.5, &WeaponInput::default());
        assert_eq!((weapon.ammo().ammo(), weapon.ammo().reserve()), (0, 52));

        let events = weapon.update(0.5, &WeaponInput::default());
        assert_eq!(
            events.as_slice(),
            &[
                WeaponEvent::ReloadOccurred,
                WeaponEvent::ReloadStopped,
                WeaponEvent::AmmoChanged {
                    ammo: 10,
                    reserve: 42
                }
            ]
        );
        assert!(!weapon.is_reloading());
    }

    #[test]
    fn test_preserve_clip_keeps_rounds() {
        let mut weapon = Weapon::new(
            WeaponConfig::new(10, 100).with_reload(ReloadMode::PreserveClip, 0.5, 0.0),
        )
        .with_ammo(4, 20);
        let events = weapon.update(0.1, &WeaponInput::reload());
        assert_eq!(events.as_slice(), &[WeaponEvent::ReloadStarted]);
        weapon.update(0.5, &WeaponInput::default());
        assert_eq!((weapon.ammo().ammo(), weapon.ammo().reserve()), (10, 14));
    }

    #[test]
    fn test_reload_is_ignored_when_full_or_dry() {
        let mut full = Weapon::new(WeaponConfig::new(10, 100));
        assert!(full.update(0.1, &WeaponInput::reload()).is_empty());
        assert!(!full.is_reloading());

        let mut dry = Weapon::new(WeaponConfig::new(10, 100)).with_ammo(3, 0);
        assert!(dry.update(0.1, &WeaponInput::reload()).is_empty());
        assert!(!dry.is_reloading());
    }

    #[test]
    fn test_shotgun_reload_loads_one_by_one() {
        let mut weapon = Weapon::new(
            WeaponConfig::new(4, 2).with_reload(ReloadMode::Shotgun, 0.5, 0.0),
        )
        .with_ammo(1, 2);
        assert_eq!(
            weapon.update(0.0, &WeaponInput::reload()).as_slice(),
            &[WeaponEvent::ReloadStarted]
        );

        let events = weapon.update(0.5, &WeaponInput::default());
        assert_eq!(
            events.as_slice(),
            &[
                WeaponEvent::ReloadOccurred,
                WeaponEvent::AmmoChanged {
                    ammo: 2,
                    reserve: 1
                }
            ]
        );
        assert!(weapon.is_reloading());

        // 备弹耗尽后停止
        let events = weapon.update(0.5, &WeaponInput::default());
        assert_eq!(
            events.as_slice(),
            &[
                WeaponEvent::ReloadOccurred,
                WeaponEvent::ReloadStopped,
                WeaponEvent::AmmoChanged {
                    ammo: 3,
                    reserve: 0
                }
            ]
        );
        assert!(!weapon.is_reloading());
    }

    #[test]
    fn test_zero_reload_time_fills_in_one_tick() {
        let mut weapon = Weapon::new(
            WeaponConfig::new(5, 10).with_reload(ReloadMode::Shotgun, 0.0, 0.0),
        )
        .with_ammo(0, 10);
        weapon.update(0.1, &WeaponInput::reload());
        let events = weapon.update(0.1, &WeaponInput::default());
        let refills = events
            .iter()
            .filter(|event| **event == WeaponEvent::ReloadOccurred)
            .count();
        assert_eq!(refills, 5);
        assert_eq!((weapon.ammo().ammo(), weapon.ammo().reserve()), (5, 5));
        assert!(!weapon.is_reloading());
    }

    #[test]
    fn test_dump_and_refill() {
        let mut weapon = Weapon::new(
            WeaponConfig::new(3, 10)
                .with_reload(ReloadMode::DumpAndRefill, 0.25, 0.25)
                .with_reload_amount(2),
        )
        .with_ammo(2, 1);
        let events = weapon.update(0.0, &WeaponInput::reload());
        assert_eq!(
            events.as_slice(),
            &[
                WeaponEvent::ReloadStarted,
                WeaponEvent::AmmoChanged {
                    ammo: 0,
                    reserve: 3
                }
            ]
        );

        weapon.update(0.25, &WeaponInput::default());
        assert_eq!(weapon.ammo().ammo(), 0);
        weapon.update(0.25, &WeaponInput::default());
        assert_eq!((weapon.ammo().ammo(), weapon.ammo().reserve()), (2, 1));
        assert!(weapon.is_reloading());

        let events = weapon.update(0.25, &WeaponInput::default());
        assert!(events.contains(&WeaponEvent::ReloadStopped));
        assert_eq!((weapon.ammo().ammo(), weapon.ammo().reserve()), (3, 0));
    }

    #[test]
    fn test_fire_press_cancels_reload() {
        let mut weapon = Weapon::new(
            WeaponConfig::new(6, 10)
                .with_reload(ReloadMode::Shotgun, 0.5, 0.0)
                .with_post_reload_delay(0.3),
        )
        .with_ammo(2, 10);
        weapon.update(0.0, &WeaponInput::reload());
        weapon.update(0.5, &WeaponInput::default());
        assert_eq!(weapon.ammo().ammo(), 3);

        let events = weapon.update(0.25, &WeaponInput::fire_pressed());
        assert_eq!(events.as_slice(), &[WeaponEvent::ReloadStopped]);
        assert!(!weapon.is_reloading());
        assert_eq!(weapon.action_timer(), 0.3);
        assert_eq!(weapon.ammo().ammo(), 3);
    }

    #[test]
    fn test_fire_press_cannot_cancel_with_empty_clip() {
        let mut weapon = Weapon::new(
            WeaponConfig::new(6, 10).with_reload(ReloadMode::FullClip, 1.0, 0.0),
        )
        .with_ammo(1, 10);
        weapon.update(0.0, &WeaponInput::reload());
        assert_eq!(weapon.ammo().ammo(), 0);
        let events = weapon.update(0.25, &WeaponInput::fire_pressed());
        assert!(events.is_empty());
        assert!(weapon.is_reloading());
    }
}
