//! 无窗口地运行一把武器, 打印产生的事件
//!
//! Runs a charge rifle headless through fire, scope and reload and logs every
//! [`WeaponMessage`].

use std::time::Duration;

use bevy::{log::LogPlugin, prelude::*};
use bevy_gameplay_fsm::prelude::*;

const TICK: Duration = Duration::from_millis(50);

fn spawn_rifle(mut commands: Commands) {
    let config = WeaponConfig::new(12, 36)
        .with_primary(FireParams::automatic(8.0))
        .with_secondary(FireParams::charge_and_release(0.2, 1.0, 0.5).with_ammo_cost(4))
        .with_reload(ReloadMode::FullClip, 0.6, 0.1)
        .with_scope(ScopeMode::Hold, 0.15, 0.1);
    commands.spawn((Name::new("rifle"), Weapon::new(config)));
}

fn drive_input(mut frame: Local<u32>, mut inputs: Query<&mut WeaponInput>) {
    *frame += 1;
    let frame = *frame;
    for mut input in &mut inputs {
        *input = match frame {
            1..=20 => WeaponInput::fire_held(),
            21 => WeaponInput::reload(),
            // 瞄准后按住副通道蓄力, 第 70 帧松开
            40..=69 => WeaponInput {
                scope_held: true,
                fire_held: true,
                ..default()
            },
            70..=75 => WeaponInput::scope_held(),
            _ => WeaponInput::default(),
        };
    }
}

fn log_messages(mut messages: MessageReader<WeaponMessage>, names: Query<&Name>) {
    for message in messages.read() {
        let name = names
            .get(message.weapon)
            .map(Name::as_str)
            .unwrap_or("?");
        info!("[{}] {:?}", name, message.event);
    }
}

fn main() {
    let mut app = App::new();
    app.add_plugins((LogPlugin::default(), WeaponPlugin::new(Update)))
        .init_resource::<Time>()
        .add_systems(Startup, spawn_rifle)
        .add_systems(PreUpdate, drive_input)
        .add_systems(PostUpdate, log_messages);

    for _ in 0..90 {
        app.world_mut().resource_mut::<Time>().advance_by(TICK);
        app.update();
    }
}
