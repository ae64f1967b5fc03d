//! 打印角色状态机的进入/退出顺序
//!
//! Prints the enter/step/exit trace of a small grounded/airborne actor.

use bevy::{log::LogPlugin, prelude::*};
use bevy_gameplay_fsm::prelude::*;

#[derive(Default)]
struct Actor {
    on_ground: bool,
    jump_pressed: bool,
    speed: f32,
    airtime: f32,
}

struct Grounded;

impl ActorState<Actor> for Grounded {
    fn enter(&mut self, _ctx: &mut StateContext<'_, Actor>) {
        info!("enter grounded");
    }

    fn step(&mut self, ctx: &mut StateContext<'_, Actor>, _delta: f32) {
        if ctx.actor().jump_pressed {
            ctx.actor_mut().jump_pressed = false;
            ctx.actor_mut().on_ground = false;
            // 跳起时不再更新 idle/run
            ctx.cancel();
            ctx.transition_to("airborne", -1);
        }
    }

    fn exit(&mut self, _ctx: &mut StateContext<'_, Actor>) {
        info!("exit grounded");
    }
}

struct Idle;

impl ActorState<Actor> for Idle {
    fn enter(&mut self, _ctx: &mut StateContext<'_, Actor>) {
        info!("  enter idle");
    }

    fn step(&mut self, ctx: &mut StateContext<'_, Actor>, _delta: f32) {
        if ctx.actor().speed > 0.0 {
            ctx.transition_to("run", 1);
        }
    }

    fn exit(&mut self, _ctx: &mut StateContext<'_, Actor>) {
        info!("  exit idle");
    }
}

struct Run;

impl ActorState<Actor> for Run {
    fn enter(&mut self, _ctx: &mut StateContext<'_, Actor>) {
        info!("  enter run");
    }

    fn step(&mut self, ctx: &mut StateContext<'_, Actor>, _delta: f32) {
        if ctx.actor().speed <= 0.0 {
            ctx.transition_to("idle", 1);
        }
    }

    fn exit(&mut self, _ctx: &mut StateContext<'_, Actor>) {
        info!("  exit run");
    }
}

struct Airborne;

impl ActorState<Actor> for Airborne {
    fn enter(&mut self, ctx: &mut StateContext<'_, Actor>) {
        info!("enter airborne");
        ctx.actor_mut().airtime = 0.0;
    }

    fn step(&mut self, ctx: &mut StateContext<'_, Actor>, delta: f32) {
        let actor = ctx.actor_mut();
        actor.airtime += delta;
        if actor.airtime >= 0.3 {
            actor.on_ground = true;
            ctx.transition_to("grounded", -1);
        }
    }

    fn exit(&mut self, _ctx: &mut StateContext<'_, Actor>) {
        info!("exit airborne");
    }
}

fn main() -> Result<(), StateTreeError> {
    let mut app = App::new();
    app.add_plugins(LogPlugin::default());

    let tree = state_tree! {
        "grounded": Grounded => {
            "idle": Idle,
            "run": Run,
        },
        "airborne": Airborne,
    }?;
    let actor = Actor {
        on_ground: true,
        ..default()
    };
    let mut machine = ActorStateMachine::attach(tree, actor)?;

    let delta = 0.1;
    for tick in 0..12 {
        match tick {
            2 => machine.actor_mut().speed = 5.0,
            5 => machine.actor_mut().jump_pressed = true,
            10 => machine.actor_mut().speed = 0.0,
            _ => {}
        }
        machine.step(delta);
        info!(
            "tick {:>2}: {:?} (on ground: {})",
            tick,
            machine.active_names(),
            machine.actor().on_ground
        );
    }

    let history = machine
        .history()
        .iter()
        .filter_map(|state| machine.tree().name(state))
        .collect::<Vec<_>>();
    info!("top-level history: {:?}", history);
    Ok(())
}
