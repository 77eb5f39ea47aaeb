//! Per-frame intent capture (Update, `PlayerControllerSet::Capture`)
//!
//! Порядок внутри frame фиксирован:
//! aim look → dig → torch → stamina potion → movement (coyote / jump edges)
//!
//! Сенсоры (`SensorReadings`) уже обновлены backend'ом в `PlayerControllerSet::Sense`.

use bevy::prelude::*;

use super::animation::AnimationCue;
use super::config::ControllerConfig;
use super::input::PlayerInput;
use super::state::PlayerController;
use super::{AimHighlight, RunBoostIntent};
use crate::inventory::{Inventory, ResourceLedger};
use crate::logger::log;
use crate::physics::{CastHit, PlayerBody, SensorReadings};
use crate::tools::CurrentTool;
use crate::world::{
    floor_to_tile_center, spawn_torch, torches_in_box, DigTilemap, TileLookup, Torch, TorchPlaced,
};

/// Точка попадания aim ray → центр тайла, в который смотрим
///
/// Точку сдвигаем на `epsilon` против нормали, чтобы floor попал внутрь блока,
/// а не в соседнюю пустую клетку на границе.
pub fn look_position_from_hit(hit: &CastHit, epsilon: f32) -> Vec3 {
    let inside = hit.point - hit.normal * epsilon;
    floor_to_tile_center(inside.extend(0.0))
}

/// Aim look: highlight + look position
///
/// Возвращает новое состояние highlight; `look_position` обновляется только при попадании.
pub fn update_aim(
    controller: &mut PlayerController,
    readings: &SensorReadings,
    epsilon: f32,
    tiles: Option<&impl TileLookup>,
) -> AimHighlight {
    if controller.is_climbing() {
        return AimHighlight::hidden();
    }

    let Some(hit) = readings.aim_hit else {
        return AimHighlight::hidden();
    };

    let look = look_position_from_hit(&hit, epsilon);
    controller.look_position = look;

    AimHighlight {
        visible: tiles.is_some_and(|tiles| tiles.tile_at(look)),
        position: look,
    }
}

/// Результат нажатия torch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TorchAction {
    /// Подобрали N факелов рядом
    PickedUp(u32),
    /// Рядом пусто, поставили один из инвентаря
    Placed,
    /// Рядом пусто и в инвентаре пусто
    Nothing,
}

/// Решение по torch edge; ledger мутируется здесь, мир: вызывающим
pub fn resolve_torch_use(nearby: usize, ledger: &mut impl ResourceLedger) -> TorchAction {
    if nearby > 0 {
        let count = u32::try_from(nearby).unwrap_or(u32::MAX);
        ledger.add_torch(count);
        return TorchAction::PickedUp(count);
    }

    if ledger.has_torches() && ledger.remove_torch(1) {
        return TorchAction::Placed;
    }

    TorchAction::Nothing
}

/// Stamina potion edge: `true` если potion выпит
pub fn drink_stamina_potion(ledger: &mut impl ResourceLedger, amount: f32) -> bool {
    if !ledger.has_potions() {
        return false;
    }

    ledger.remove_potion(1);
    ledger.add_stamina(amount);
    true
}

// === Systems ===

/// Система: aim raycast → look position + highlight
pub fn aim_look(
    tilemap: Option<Res<DigTilemap>>,
    mut players: Query<(
        &ControllerConfig,
        &SensorReadings,
        &mut PlayerController,
        &mut AimHighlight,
    )>,
) {
    let tiles = tilemap.as_deref();

    for (config, readings, mut controller, mut highlight) in players.iter_mut() {
        let next = update_aim(&mut controller, readings, config.dig_surface_epsilon, tiles);
        if *highlight != next {
            *highlight = next;
        }
    }
}

/// Система: dig held → начать удар (если не копаем)
pub fn start_dig(
    mut cues: EventWriter<AnimationCue>,
    mut players: Query<(Entity, &PlayerInput, &CurrentTool, &mut PlayerController)>,
) {
    for (entity, input, tool, mut controller) in players.iter_mut() {
        if !input.dig_held || controller.is_digging() {
            continue;
        }

        if controller.begin_dig() {
            cues.write(AnimationCue::Dig {
                entity,
                tier: tool.0.tier,
            });
        }
    }
}

/// Система: torch edge → подобрать ближайшие / поставить из инвентаря
pub fn use_torch(
    mut commands: Commands,
    mut placed: EventWriter<TorchPlaced>,
    torches: Query<(Entity, &Transform), With<Torch>>,
    mut players: Query<(Entity, &Transform, &ControllerConfig, &PlayerInput, &mut Inventory)>,
) {
    for (entity, transform, config, input, mut inventory) in players.iter_mut() {
        if !input.torch_pressed {
            continue;
        }

        let center = transform.translation.truncate() + config.torch_pickup_offset;
        let nearby = torches_in_box(center, config.torch_pickup_box_size, torches.iter());

        match resolve_torch_use(nearby.len(), &mut *inventory) {
            TorchAction::PickedUp(count) => {
                for torch in nearby {
                    commands.entity(torch).despawn();
                }
                log(&format!("🔥 Entity {:?} picked up {} torch(es)", entity, count));
            }
            TorchAction::Placed => {
                let torch = spawn_torch(&mut commands, transform.translation);
                placed.write(TorchPlaced {
                    entity,
                    torch,
                    position: transform.translation,
                });
                log(&format!(
                    "🔥 Entity {:?} placed torch {:?} at {:?}",
                    entity, torch, transform.translation
                ));
            }
            TorchAction::Nothing => {}
        }
    }
}

/// Система: potion edge → +stamina
pub fn use_stamina_potion(
    mut players: Query<(Entity, &ControllerConfig, &PlayerInput, &mut Inventory)>,
) {
    for (entity, config, input, mut inventory) in players.iter_mut() {
        if !input.potion_pressed {
            continue;
        }

        if drink_stamina_potion(&mut *inventory, config.stamina_potion_amount) {
            log(&format!(
                "🧪 Entity {:?} drank stamina potion (stamina {:.1}, potions left {})",
                entity, inventory.stamina, inventory.stamina_potions
            ));
        }
    }
}

/// Система: coyote counter + jump down/up edges
pub fn movement_intent(
    time: Res<Time>,
    mut cues: EventWriter<AnimationCue>,
    mut players: Query<(
        Entity,
        &ControllerConfig,
        &PlayerInput,
        &SensorReadings,
        &mut PlayerController,
        &mut PlayerBody,
    )>,
) {
    let delta = time.delta_secs();

    for (entity, config, input, readings, mut controller, mut body) in players.iter_mut() {
        controller.update_coyote(readings.grounded, config.coyote_time, delta);

        if input.jump_pressed && controller.try_accept_jump() {
            cues.write(AnimationCue::Jump { entity });
        }

        if input.jump_released {
            if let Some(vertical_velocity) = controller.release_jump(body.velocity.y) {
                body.velocity.y = vertical_velocity;
            }
        }
    }
}

/// Система: RunBoostIntent → множитель walk speed
pub fn process_run_boost(
    mut events: EventReader<RunBoostIntent>,
    mut players: Query<(&ControllerConfig, &mut PlayerController)>,
) {
    for intent in events.read() {
        let Ok((config, mut controller)) = players.get_mut(intent.entity) else {
            continue;
        };

        controller.activate_run_boost(config.run_boost_multiplier);
        log(&format!(
            "🏃 Entity {:?} run boost → x{:.3}",
            intent.entity, controller.speed_multiplier
        ));
    }
}
