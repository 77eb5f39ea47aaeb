//! Controller tunables (supplied at spawn, per player entity)
//!
//! Значения по умолчанию совпадают с настройками prefab'а игрока.
//! Позиция игрока = центр тела (высота ~1.8, ширина ~0.8 world units).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision_layers::{LayerMask, COLLISION_MASK_DIG, COLLISION_MASK_GROUND};

/// Все tunables контроллера
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct ControllerConfig {
    // === Movement ===
    /// Горизонтальная скорость (units/sec), мгновенная (без разгона)
    pub walk_speed: f32,
    /// Вертикальная скорость подъёма по стене (override gravity)
    pub climb_speed: f32,
    /// Вертикальный импульс прыжка (и magnitude Jump notification)
    pub jump_force: f32,
    /// Coyote window (секунды)
    pub coyote_time: f32,
    /// |horizontal| выше deadzone разворачивает персонажа
    pub facing_deadzone: f32,
    /// Множитель `ActivateRunBoost`
    pub run_boost_multiplier: f32,

    // === Sensors ===
    pub ground_check_box_size: Vec2,
    pub ground_check_cast_distance: f32,
    pub climb_check_box_size: Vec2,
    pub climb_check_cast_distance: f32,
    /// Смещение origin climb-сенсора от центра тела
    pub climb_check_offset: Vec2,
    pub ground_mask: LayerMask,
    pub dig_mask: LayerMask,
    /// Сдвиг точки попадания внутрь поверхности (против нормали)
    pub dig_surface_epsilon: f32,

    // === Items ===
    /// AABB вокруг игрока для подбора факелов
    pub torch_pickup_box_size: Vec2,
    pub torch_pickup_offset: Vec2,
    pub stamina_potion_amount: f32,

    // === Throttled periodic actions ===
    pub stamina_drain_amount: f32,
    pub stamina_drain_interval: f32,
    pub movement_tick_interval: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            climb_speed: 3.0,
            jump_force: 7.0,
            coyote_time: 0.2,
            facing_deadzone: 0.01,
            run_boost_multiplier: 1.25,

            ground_check_box_size: Vec2::new(0.6, 0.1),
            ground_check_cast_distance: 0.9,
            climb_check_box_size: Vec2::new(0.1, 0.6),
            climb_check_cast_distance: 0.5,
            climb_check_offset: Vec2::new(0.0, -0.5),
            ground_mask: COLLISION_MASK_GROUND,
            dig_mask: COLLISION_MASK_DIG,
            dig_surface_epsilon: 0.01,

            torch_pickup_box_size: Vec2::new(1.5, 2.0),
            torch_pickup_offset: Vec2::ZERO,
            stamina_potion_amount: crate::inventory::STAMINA_POTION_AMOUNT,

            stamina_drain_amount: 1.0,
            stamina_drain_interval: 1.0,
            movement_tick_interval: 0.6,
        }
    }
}

impl ControllerConfig {
    /// Минимальный интервал таймера (Timer с 0 сек срабатывает каждый tick)
    pub const MIN_INTERVAL: f32 = 0.01;

    /// Привести явно невалидные значения к безопасным
    ///
    /// - интервалы таймеров ≥ MIN_INTERVAL
    /// - размеры/дистанции сенсоров по модулю (знак задаёт facing, не конфиг)
    /// - coyote_time ≥ 0
    pub fn validated(mut self) -> Self {
        self.stamina_drain_interval = self.stamina_drain_interval.max(Self::MIN_INTERVAL);
        self.movement_tick_interval = self.movement_tick_interval.max(Self::MIN_INTERVAL);
        self.coyote_time = self.coyote_time.max(0.0);
        self.facing_deadzone = self.facing_deadzone.abs();

        self.ground_check_box_size = self.ground_check_box_size.abs();
        self.ground_check_cast_distance = self.ground_check_cast_distance.abs();
        self.climb_check_box_size = self.climb_check_box_size.abs();
        self.climb_check_cast_distance = self.climb_check_cast_distance.abs();
        self.torch_pickup_box_size = self.torch_pickup_box_size.abs();
        self
    }

    pub fn with_walk_speed(mut self, walk_speed: f32) -> Self {
        self.walk_speed = walk_speed;
        self
    }

    pub fn with_stamina_drain(mut self, amount: f32, interval: f32) -> Self {
        self.stamina_drain_amount = amount;
        self.stamina_drain_interval = interval;
        self
    }
}
