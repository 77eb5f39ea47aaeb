//! Seeded scripted input (headless soak / determinism тесты)
//!
//! Каждый frame: случайный кадр устройства для каждого игрока из `DeterministicRng`.
//! Одинаковый seed → одинаковая последовательность input → одинаковый мир.

use bevy::prelude::*;
use rand::Rng;

use crate::controller::{Player, PlayerInput, PlayerInputEvent};
use crate::DeterministicRng;

/// Ось как у клавиатуры: -1 / 0 / 1 (ноль вдвое чаще)
fn random_axis(rng: &mut impl Rng) -> f32 {
    [-1.0, 0.0, 0.0, 1.0][rng.gen_range(0..4)]
}

/// Случайный кадр input (edges редкие)
pub fn random_input(rng: &mut impl Rng) -> PlayerInput {
    PlayerInput {
        horizontal: random_axis(rng),
        vertical: random_axis(rng),
        jump_pressed: rng.gen_bool(0.05),
        jump_released: rng.gen_bool(0.05),
        torch_pressed: rng.gen_bool(0.01),
        potion_pressed: rng.gen_bool(0.01),
        dig_held: rng.gen_bool(0.2),
        aim_point: Some(Vec2::new(
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..1.0),
        )),
    }
}

/// Система: scripted input для всех игроков (aim point относительно игрока)
pub fn drive_scripted_input(
    mut rng: ResMut<DeterministicRng>,
    mut events: EventWriter<PlayerInputEvent>,
    players: Query<(Entity, &Transform), With<Player>>,
) {
    let mut players: Vec<_> = players.iter().collect();
    // Порядок итерации Query не гарантирован: сортируем для детерминизма
    players.sort_by_key(|(entity, _)| entity.index());

    for (entity, transform) in players {
        let mut input = random_input(&mut rng.rng);
        input.aim_point = input
            .aim_point
            .map(|offset| transform.translation.truncate() + offset);

        events.write(PlayerInputEvent { entity, input });
    }
}
