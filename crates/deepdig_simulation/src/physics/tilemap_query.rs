//! Headless physics backend поверх `DigTilemap`
//!
//! Для тестов и headless симуляции без Rapier:
//! - shape cast = дискретный sweep AABB по сетке тайлов (angle игнорируется)
//! - raycast = march по лучу до входа в занятую клетку
//! - интеграция: gravity + velocity → Transform (как kinematic controller, без коллизий по X)
//!
//! Все тайлы считаются лежащими на diggable слое.

use bevy::prelude::*;

use super::{sense, CastHit, PhysicsQuery, PlayerBody, RayCast, SensorReadings, ShapeCast};
use crate::collision_layers::COLLISION_LAYER_DIGGABLE;
use crate::controller::{ControllerConfig, PlayerController, PlayerControllerSet, PlayerInput};
use crate::tools::CurrentTool;
use crate::world::DigTilemap;

/// Шаг дискретизации sweep/march (world units)
const SWEEP_STEP: f32 = 0.02;

/// Предел дальности запроса (world units)
pub const MAX_QUERY_DISTANCE: f32 = 256.0;

/// PhysicsQuery поверх tilemap
pub struct TilemapQuery<'a> {
    tilemap: &'a DigTilemap,
}

impl<'a> TilemapQuery<'a> {
    pub fn new(tilemap: &'a DigTilemap) -> Self {
        Self { tilemap }
    }

    /// Дистанция запроса в пределах [0, MAX_QUERY_DISTANCE] (inf / NaN не дают бесконечный sweep)
    fn reach(distance: f32) -> f32 {
        if distance.is_nan() {
            0.0
        } else {
            distance.clamp(0.0, MAX_QUERY_DISTANCE)
        }
    }

    fn steps(&self, distance: f32) -> usize {
        let step = SWEEP_STEP.min(self.tilemap.cell_size * 0.25);
        ((distance / step).ceil() as usize).max(1)
    }
}

impl PhysicsQuery for TilemapQuery<'_> {
    fn shape_cast(&self, cast: &ShapeCast) -> Option<CastHit> {
        if cast.layer_mask & COLLISION_LAYER_DIGGABLE == 0 {
            return None;
        }

        let reach = Self::reach(cast.max_distance);
        let steps = self.steps(reach);
        let half_along = (cast.box_size * 0.5 * cast.direction).abs().length();

        (0..=steps).find_map(|i| {
            let distance = reach * i as f32 / steps as f32;
            let center = cast.origin + cast.direction * distance;

            self.tilemap
                .overlaps_box(center, cast.box_size)
                .then(|| CastHit {
                    point: center + cast.direction * half_along,
                    normal: -cast.direction,
                    distance,
                })
        })
    }

    fn ray_cast(&self, ray: &RayCast) -> Option<CastHit> {
        if ray.layer_mask & COLLISION_LAYER_DIGGABLE == 0 {
            return None;
        }

        let reach = Self::reach(ray.max_distance);
        let steps = self.steps(reach);
        let mut previous = self.tilemap.world_to_cell(ray.origin);

        for i in 1..=steps {
            let distance = reach * i as f32 / steps as f32;
            let point = ray.origin + ray.direction * distance;
            let cell = self.tilemap.world_to_cell(point);

            if cell == previous {
                continue;
            }

            if self.tilemap.has_cell(cell) {
                // Нормаль: грань, через которую вошли в клетку
                let normal = if cell.x != previous.x {
                    Vec2::new(-((cell.x - previous.x).signum() as f32), 0.0)
                } else {
                    Vec2::new(0.0, -((cell.y - previous.y).signum() as f32))
                };

                return Some(CastHit {
                    point,
                    normal,
                    distance,
                });
            }

            previous = cell;
        }

        None
    }
}

/// Gravity для headless интеграции (units/sec², отрицательная = вниз)
#[derive(Resource, Debug, Clone, Copy)]
pub struct HeadlessGravity(pub f32);

impl Default for HeadlessGravity {
    fn default() -> Self {
        Self(-9.81 * 2.0)
    }
}

/// Система: сенсоры игрока через tilemap (нет tilemap → показания не трогаем)
pub fn sense_with_tilemap(
    tilemap: Option<Res<DigTilemap>>,
    mut players: Query<(
        &Transform,
        &ControllerConfig,
        &PlayerController,
        &PlayerInput,
        &CurrentTool,
        &mut SensorReadings,
    )>,
) {
    let Some(tilemap) = tilemap else {
        return;
    };
    let query = TilemapQuery::new(&tilemap);

    for (transform, config, controller, input, tool, mut readings) in players.iter_mut() {
        *readings = sense(
            &query,
            config,
            transform.translation.truncate(),
            controller.facing,
            input.aim_point,
            tool.0.range,
        );
    }
}

/// Система: gravity + velocity → Transform
///
/// Grounded тело не падает (vy < 0 обнуляется), gravity только в воздухе.
pub fn integrate_headless_body(
    time: Res<Time<Fixed>>,
    gravity: Res<HeadlessGravity>,
    mut bodies: Query<(&SensorReadings, &mut PlayerBody, &mut Transform)>,
) {
    let delta = time.delta_secs();

    for (readings, mut body, mut transform) in bodies.iter_mut() {
        if readings.grounded {
            if body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
        } else {
            body.velocity.y += gravity.0 * delta;
        }

        transform.translation += (body.velocity * delta).extend(0.0);
    }
}

/// Headless physics backend (вместо Rapier)
pub struct HeadlessPhysicsPlugin;

impl Plugin for HeadlessPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeadlessGravity>()
            .add_systems(Update, sense_with_tilemap.in_set(PlayerControllerSet::Sense))
            .add_systems(
                FixedUpdate,
                (
                    sense_with_tilemap.in_set(PlayerControllerSet::Sense),
                    integrate_headless_body.in_set(PlayerControllerSet::Integrate),
                ),
            );
    }
}
