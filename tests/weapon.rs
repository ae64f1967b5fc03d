use bevy_gameplay_fsm::prelude::*;
use pretty_assertions::assert_eq;

fn idle() -> WeaponInput {
    WeaponInput::default()
}

fn counts(weapon: &Weapon) -> (i32, i32) {
    (weapon.ammo().ammo(), weapon.ammo().reserve())
}

#[test]
fn charge_and_release_pays_the_full_cost() {
    let config = WeaponConfig::new(30, 0).with_primary(
        FireParams::charge_and_release(0.2, 1.0, 0.0)
            .with_ammo_cost(5)
            .with_fire_rate(0.0),
    );
    let mut weapon = Weapon::new(config);

    for expected in [29, 28, 27, 25] {
        let events = weapon.update(0.25, &WeaponInput::fire_held());
        assert_eq!(
            events.as_slice(),
            &[WeaponEvent::AmmoChanged {
                ammo: expected,
                reserve: 0
            }]
        );
        assert!(weapon.is_charging());
    }
    assert_eq!(weapon.charge_ammo_consumed(), 5);

    let events = weapon.update(0.25, &idle());
    assert_eq!(
        events.as_slice(),
        &[WeaponEvent::ChargedFire {
            channel: FireChannel::Primary,
            pct_time: 1.0,
            pct_ammo: 1.0,
        }]
    );
    assert!(!weapon.is_charging());
    assert_eq!(counts(&weapon), (25, 0));
}

#[test]
fn charge_at_sixty_fps_pays_the_full_cost() {
    let config = WeaponConfig::new(30, 0).with_primary(
        FireParams::charge_and_release(0.2, 1.0, 0.0)
            .with_ammo_cost(5)
            .with_fire_rate(0.0),
    );
    let mut weapon = Weapon::new(config);

    for _ in 0..60 {
        let events = weapon.update(1.0 / 60.0, &WeaponInput::fire_held());
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, WeaponEvent::ChargedFire { .. }))
        );
    }
    assert_eq!(weapon.charge_ammo_consumed(), 5);

    let events = weapon.update(1.0 / 60.0, &idle());
    assert_eq!(
        events.as_slice(),
        &[WeaponEvent::ChargedFire {
            channel: FireChannel::Primary,
            pct_time: 1.0,
            pct_ammo: 1.0,
        }]
    );
    assert_eq!(counts(&weapon), (25, 0));
}

#[test]
fn charge_continues_until_min_charge() {
    let config = WeaponConfig::new(10, 0).with_primary(
        FireParams::charge_and_release(0.5, 1.0, 0.0)
            .with_ammo_cost(2)
            .with_fire_rate(0.0),
    );
    let mut weapon = Weapon::new(config);

    weapon.update(0.125, &WeaponInput::fire_held());
    // 松开后仍然蓄力到 min_charge
    for _ in 0..3 {
        let events = weapon.update(0.125, &idle());
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, WeaponEvent::ChargedFire { .. }))
        );
    }
    assert!(weapon.is_charging());

    let events = weapon.update(0.125, &idle());
    assert!(matches!(
        events.as_slice(),
        [WeaponEvent::ChargedFire {
            channel: FireChannel::Primary,
            ..
        }]
    ));
}

#[test]
fn full_clip_reload_cycle() {
    let config = WeaponConfig::new(10, 100).with_reload(ReloadMode::FullClip, 1.0, 0.0);
    let mut weapon = Weapon::new(config).with_ammo(2, 50);

    weapon.update(0.1, &WeaponInput::reload());
    assert_eq!(counts(&weapon), (0, 52));
    assert!(weapon.is_reloading());

    weapon.update(1.0, &idle());
    assert_eq!(counts(&weapon), (10, 42));
    assert!(!weapon.is_reloading());
}

#[test]
fn energy_reload_waits_for_its_delay() {
    let config = WeaponConfig::new(10, 20)
        .with_primary(FireParams::automatic(0.0))
        .with_reload(ReloadMode::Energy, 0.25, 0.0)
        .with_energy_reload_delay(1.0);
    let mut weapon = Weapon::new(config);

    let events = weapon.update(0.25, &WeaponInput::fire_held());
    assert_eq!(
        events.as_slice(),
        &[
            WeaponEvent::Fired {
                channel: FireChannel::Primary
            },
            WeaponEvent::AmmoChanged {
                ammo: 9,
                reserve: 20
            }
        ]
    );

    for _ in 0..3 {
        assert!(weapon.update(0.25, &idle()).is_empty());
        assert!(weapon.energy_reload_timer() > 0.0);
    }

    let events = weapon.update(0.25, &idle());
    assert_eq!(events.as_slice(), &[WeaponEvent::ReloadStarted]);

    let events = weapon.update(0.25, &idle());
    assert_eq!(
        events.as_slice(),
        &[
            WeaponEvent::ReloadOccurred,
            WeaponEvent::ReloadStopped,
            WeaponEvent::AmmoChanged {
                ammo: 10,
                reserve: 19
            }
        ]
    );
    assert_eq!(weapon.energy_reload_timer(), 1.0);
}

#[test]
fn disabled_weapon_only_counts_down() {
    let mut weapon = Weapon::new(WeaponConfig::new(10, 10).with_primary(FireParams::automatic(0.0)));
    weapon.set_enabled(false);
    assert!(weapon.update(0.1, &WeaponInput::fire_held()).is_empty());
    assert_eq!(counts(&weapon), (10, 10));

    weapon.set_enabled(true);
    assert_eq!(
        weapon.update(0.1, &WeaponInput::fire_held()).first(),
        Some(&WeaponEvent::Fired {
            channel: FireChannel::Primary
        })
    );
}

#[test]
fn ammo_stays_in_bounds_under_random_input() {
    let config = WeaponConfig::new(6, 12)
        .with_primary(
            FireParams::automatic(20.0)
                .with_ammo_cost(4)
                .with_overflow(OverflowPolicy::FillFromReserve),
        )
        .with_secondary(FireParams::charge_and_release(0.1, 0.4, 0.2).with_ammo_cost(3))
        .with_reload(ReloadMode::Shotgun, 0.1, 0.05)
        .with_scope(ScopeMode::Toggle, 0.1, 0.1);
    let mut weapon = Weapon::new(config);

    // 简单的线性同余序列, 结果可复现
    let mut seed = 0x2545_f491_u32;
    for tick in 0..2000 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let bits = seed >> 16;
        let input = WeaponInput {
            fire_pressed: bits & 1 != 0,
            fire_held: bits & 2 != 0,
            reload_pressed: bits & 4 != 0 && bits & 8 != 0,
            scope_pressed: bits & 16 != 0 && bits & 32 != 0 && bits & 64 != 0,
            scope_held: false,
        };
        if tick % 300 == 0 {
            weapon.replenish_ammo(5);
        }
        weapon.update(0.016 * (1 + bits % 4) as f32, &input);

        let (clip, reserve) = counts(&weapon);
        assert!((0..=6).contains(&clip), "clip {} out of range", clip);
        assert!(reserve >= 0, "reserve {} below zero", reserve);
        assert!(weapon.action_timer() >= 0.0);
        assert!((0.0..=1.0).contains(&weapon.scope_progress()));
    }
}
