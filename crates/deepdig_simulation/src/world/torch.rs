//! Torches: placeable light sources
//!
//! Torch = entity с `Torch` + `Transform`. Визуал/свет добавляет presentation layer
//! по `Added<Torch>`; здесь только факт существования и позиция.

use bevy::prelude::*;

/// Marker component для поставленного факела
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Torch;

/// Event: игрок поставил факел (audio / presentation реагируют)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TorchPlaced {
    pub entity: Entity,
    pub torch: Entity,
    pub position: Vec3,
}

/// Факелы внутри AABB (center ± size/2), границы включительно
pub fn torches_in_box<'a>(
    center: Vec2,
    size: Vec2,
    torches: impl IntoIterator<Item = (Entity, &'a Transform)>,
) -> Vec<Entity> {
    let half = size * 0.5;

    torches
        .into_iter()
        .filter(|(_, transform)| {
            let offset = (transform.translation.truncate() - center).abs();
            offset.x <= half.x && offset.y <= half.y
        })
        .map(|(entity, _)| entity)
        .collect()
}

/// Spawn факела в позиции игрока
pub fn spawn_torch(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((Torch, Transform::from_translation(position)))
        .id()
}
