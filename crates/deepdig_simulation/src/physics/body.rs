//! Player rigid body state, видимое контроллеру
//!
//! Velocity принадлежит physics engine; backend sync системы копируют её
//! в `PlayerBody` перед логикой контроллера и обратно после.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerBody {
    pub velocity: Vec2,
    pub mass: f32,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            mass: 1.0,
        }
    }
}

impl PlayerBody {
    /// Мгновенный импульс: Δv = J / m
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        let mass = self.mass.max(f32::EPSILON);
        self.velocity += impulse / mass;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
