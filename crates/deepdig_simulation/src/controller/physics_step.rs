//! Physics step (FixedUpdate, `PlayerControllerSet::Resolve`)
//!
//! Фиксированный порядок: jump → horizontal velocity → climb override → facing.
//! Facing обновляется последним: climb sensor следующего шага смотрит в новую сторону.

use bevy::prelude::*;

use super::animation::AnimationCue;
use super::config::ControllerConfig;
use super::input::PlayerInput;
use super::state::{Locomotion, PlayerController};
use crate::notifications::{Notification, NotificationBus, NotificationKind};
use crate::physics::{PlayerBody, SensorReadings};

/// Что произошло за один physics step (для notifications / animation cues)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepOutcome {
    /// Jump impulse применён в этом шаге
    pub jumped: bool,
    pub moving: bool,
    pub climbing: bool,
}

/// Один physics step контроллера (без side effects вне аргументов)
pub fn resolve_physics_step(
    controller: &mut PlayerController,
    body: &mut PlayerBody,
    input: &PlayerInput,
    readings: &SensorReadings,
    config: &ControllerConfig,
) -> StepOutcome {
    // 1. Jump (запрос забирается ровно один раз)
    let jumped = controller.take_jump_request();
    if jumped {
        body.velocity.y = 0.0;
        body.apply_impulse(Vec2::new(0.0, config.jump_force));
    }

    // 2. Walk
    body.velocity.x = input.horizontal * config.walk_speed * controller.speed_multiplier;
    let mut moving = input.has_axis_input();

    // 3. Climb
    controller.locomotion = Locomotion::resolve(readings.grounded, readings.climb_contact);
    let climbing = controller.is_climbing();
    if climbing && input.vertical > 0.0 {
        body.velocity = Vec2::new(0.0, config.climb_speed);
        moving = false;
    }
    controller.moving = moving;

    // 4. Facing
    controller.update_facing(input.horizontal, config.facing_deadzone);

    StepOutcome {
        jumped,
        moving,
        climbing,
    }
}

/// Система: physics step для всех игроков
pub fn apply_physics_step(
    bus: Res<NotificationBus>,
    mut cues: EventWriter<AnimationCue>,
    mut players: Query<(
        Entity,
        &Transform,
        &ControllerConfig,
        &PlayerInput,
        &SensorReadings,
        &mut PlayerController,
        &mut PlayerBody,
    )>,
) {
    for (entity, transform, config, input, readings, mut controller, mut body) in players.iter_mut() {
        let outcome = resolve_physics_step(&mut controller, &mut body, input, readings, config);

        if outcome.jumped {
            bus.fire(
                NotificationKind::Jump,
                Notification::new(transform.translation, config.jump_force),
            );
        }

        cues.write(AnimationCue::Moving {
            entity,
            moving: outcome.moving,
        });
        cues.write(AnimationCue::Climbing {
            entity,
            climbing: outcome.climbing,
        });
    }
}
