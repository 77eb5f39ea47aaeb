//! Physics query adapter: ground / climb / aim sensors
//!
//! Архитектура:
//! - `PhysicsQuery` trait: shape cast + raycast против layer mask (engine-agnostic)
//! - `ShapeCast` / `RayCast`: параметры запроса, пересчитываются каждый query (не state)
//! - `SensorReadings`: результат сенсоров на player entity, читается контроллером
//! - Backends: Rapier (`rapier` module), tilemap grid для headless (`tilemap_query`)
//!
//! Query miss = `None`, никогда не ошибка.

use bevy::prelude::*;

use crate::collision_layers::LayerMask;
use crate::controller::{ControllerConfig, Facing};

pub mod body;
pub mod rapier;
pub mod tilemap_query;

pub use body::PlayerBody;
pub use rapier::{insert_rapier_body, RapierQuery, RapierSensingPlugin};
pub use tilemap_query::{HeadlessPhysicsPlugin, HeadlessGravity, TilemapQuery};

/// Первое пересечение sweep/ray
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CastHit {
    pub point: Vec2,
    pub normal: Vec2,
    /// Пройденная дистанция до контакта
    pub distance: f32,
}

/// Box sweep параметры
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeCast {
    pub origin: Vec2,
    pub box_size: Vec2,
    /// Поворот box (радианы)
    pub angle: f32,
    /// Нормализованное направление sweep
    pub direction: Vec2,
    pub max_distance: f32,
    pub layer_mask: LayerMask,
}

impl ShapeCast {
    /// Ground check: вниз от центра тела
    pub fn ground(config: &ControllerConfig, position: Vec2) -> Self {
        Self {
            origin: position,
            box_size: config.ground_check_box_size.abs(),
            angle: 0.0,
            direction: Vec2::NEG_Y,
            max_distance: config.ground_check_cast_distance.abs(),
            layer_mask: config.ground_mask,
        }
    }

    /// Climb check: вбок в сторону facing (знак только у direction, размер всегда положительный)
    pub fn climb(config: &ControllerConfig, position: Vec2, facing: Facing) -> Self {
        Self {
            origin: position + config.climb_check_offset,
            box_size: config.climb_check_box_size.abs(),
            angle: 0.0,
            direction: Vec2::new(facing.sign(), 0.0),
            max_distance: config.climb_check_cast_distance.abs(),
            layer_mask: config.ground_mask,
        }
    }

    /// Box в конце sweep (center, size): для debug gizmos хоста
    pub fn debug_box(&self) -> (Vec2, Vec2) {
        (self.origin + self.direction * self.max_distance, self.box_size)
    }
}

/// Ray параметры
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCast {
    pub origin: Vec2,
    /// Нормализованное направление
    pub direction: Vec2,
    pub max_distance: f32,
    pub layer_mask: LayerMask,
}

impl RayCast {
    /// Ray от игрока к aim point; `None` если aim point совпадает с позицией
    pub fn toward(origin: Vec2, target: Vec2, max_distance: f32, layer_mask: LayerMask) -> Option<Self> {
        let direction = (target - origin).try_normalize()?;
        Some(Self {
            origin,
            direction,
            max_distance,
            layer_mask,
        })
    }
}

/// Physics engine query contract
pub trait PhysicsQuery {
    fn shape_cast(&self, cast: &ShapeCast) -> Option<CastHit>;
    fn ray_cast(&self, ray: &RayCast) -> Option<CastHit>;
}

/// Показания сенсоров (обновляются backend системой в `PlayerControllerSet::Sense`)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SensorReadings {
    pub grounded: bool,
    pub climb_contact: bool,
    /// Попадание aim ray в diggable слой (в пределах range инструмента)
    pub aim_hit: Option<CastHit>,
}

/// Ground + climb сенсоры
pub fn sense_surfaces(
    query: &impl PhysicsQuery,
    config: &ControllerConfig,
    position: Vec2,
    facing: Facing,
) -> (bool, bool) {
    let grounded = query.shape_cast(&ShapeCast::ground(config, position)).is_some();
    let climb_contact = query
        .shape_cast(&ShapeCast::climb(config, position, facing))
        .is_some();
    (grounded, climb_contact)
}

/// Aim raycast (ограничен range текущего инструмента)
pub fn sense_aim(
    query: &impl PhysicsQuery,
    config: &ControllerConfig,
    position: Vec2,
    aim_point: Option<Vec2>,
    range: f32,
) -> Option<CastHit> {
    let ray = RayCast::toward(position, aim_point?, range, config.dig_mask)?;
    query.ray_cast(&ray)
}

/// Все сенсоры за один проход (общий код для всех backends)
pub fn sense(
    query: &impl PhysicsQuery,
    config: &ControllerConfig,
    position: Vec2,
    facing: Facing,
    aim_point: Option<Vec2>,
    range: f32,
) -> SensorReadings {
    let (grounded, climb_contact) = sense_surfaces(query, config, position, facing);
    SensorReadings {
        grounded,
        climb_contact,
        aim_hit: sense_aim(query, config, position, aim_point, range),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Fake backend: запоминает запросы, отвечает заранее заданным
    #[derive(Default)]
    struct ScriptedQuery {
        ground_hit: bool,
        wall_on_right: bool,
        casts: RefCell<Vec<ShapeCast>>,
    }

    impl PhysicsQuery for ScriptedQuery {
        fn shape_cast(&self, cast: &ShapeCast) -> Option<CastHit> {
            self.casts.borrow_mut().push(*cast);
            let hit = if cast.direction == Vec2::NEG_Y {
                self.ground_hit
            } else {
                self.wall_on_right && cast.direction.x > 0.0
            };
            hit.then_some(CastHit {
                point: cast.origin,
                normal: -cast.direction,
                distance: 0.0,
            })
        }

        fn ray_cast(&self, _ray: &RayCast) -> Option<CastHit> {
            None
        }
    }

    #[test]
    fn test_climb_cast_follows_facing() {
        let config = ControllerConfig::default();
        let right = ShapeCast::climb(&config, Vec2::ZERO, Facing::Right);
        let left = ShapeCast::climb(&config, Vec2::ZERO, Facing::Left);

        assert_eq!(right.direction, Vec2::X);
        assert_eq!(left.direction, Vec2::NEG_X);
        assert_eq!(right.box_size, left.box_size);
        assert_eq!(right.origin, Vec2::new(0.0, -0.5));
        assert!(left.box_size.x > 0.0);
    }

    #[test]
    fn test_sense_surfaces_wall_only_on_facing_side() {
        let config = ControllerConfig::default();
        let query = ScriptedQuery {
            wall_on_right: true,
            ..default()
        };

        assert_eq!(sense_surfaces(&query, &config, Vec2::ZERO, Facing::Right), (false, true));
        assert_eq!(sense_surfaces(&query, &config, Vec2::ZERO, Facing::Left), (false, false));
        assert_eq!(query.casts.borrow().len(), 4);
    }

    #[test]
    fn test_sense_aim_without_aim_point_is_miss() {
        let config = ControllerConfig::default();
        let query = ScriptedQuery::default();
        assert_eq!(sense_aim(&query, &config, Vec2::ZERO, None, 2.0), None);
        assert_eq!(sense_aim(&query, &config, Vec2::ZERO, Some(Vec2::ZERO), 2.0), None);
    }

    #[test]
    fn test_debug_box_at_sweep_end() {
        let config = ControllerConfig::default();
        let cast = ShapeCast::ground(&config, Vec2::new(1.0, 2.0));
        let (center, size) = cast.debug_box();
        assert_eq!(center, Vec2::new(1.0, 2.0 - config.ground_check_cast_distance));
        assert_eq!(size, config.ground_check_box_size);
    }
}
