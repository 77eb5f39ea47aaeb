//! Dig tilemap: world position → tile cell → есть ли тайл
//!
//! Сетка: квадратные клетки `cell_size`, клетка (0, 0) начинается в `origin`.
//! Хранится только факт присутствия тайла; HP/материал живут у потребителя Dig notification.

use std::collections::HashSet;

use bevy::prelude::*;

/// Tile lookup contract (tilemap / world data store)
pub trait TileLookup {
    /// Есть ли diggable тайл в клетке, куда попадает точка
    fn tile_at(&self, world_point: Vec3) -> bool;
}

/// Тайлы, которые можно копать (Resource)
#[derive(Resource, Debug, Clone)]
pub struct DigTilemap {
    cells: HashSet<IVec2>,
    pub cell_size: f32,
    pub origin: Vec2,
}

impl Default for DigTilemap {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl DigTilemap {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cells: HashSet::new(),
            cell_size: cell_size.max(f32::EPSILON),
            origin: Vec2::ZERO,
        }
    }

    /// Заполнить прямоугольник клеток [min, max] включительно
    pub fn with_rect(mut self, min: IVec2, max: IVec2) -> Self {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                self.cells.insert(IVec2::new(x, y));
            }
        }
        self
    }

    /// World → cell (floor division, корректно для отрицательных координат)
    pub fn world_to_cell(&self, world_point: Vec2) -> IVec2 {
        let local = (world_point - self.origin) / self.cell_size;
        IVec2::new(local.x.floor() as i32, local.y.floor() as i32)
    }

    /// Центр клетки в world space
    pub fn cell_center(&self, cell: IVec2) -> Vec2 {
        self.origin + (cell.as_vec2() + Vec2::splat(0.5)) * self.cell_size
    }

    pub fn has_cell(&self, cell: IVec2) -> bool {
        self.cells.contains(&cell)
    }

    pub fn insert_cell(&mut self, cell: IVec2) -> bool {
        self.cells.insert(cell)
    }

    /// Убрать тайл (после того как его докопали)
    pub fn remove_cell(&mut self, cell: IVec2) -> bool {
        self.cells.remove(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Все клетки, пересекающиеся с AABB (строго: касание границы не считается)
    pub fn overlaps_box(&self, center: Vec2, size: Vec2) -> bool {
        let half = size * 0.5;
        let min = center - half;
        let max = center + half;

        let min_cell = self.world_to_cell(min);
        let max_cell = self.world_to_cell(max);

        for x in min_cell.x..=max_cell.x {
            for y in min_cell.y..=max_cell.y {
                let cell = IVec2::new(x, y);
                if !self.has_cell(cell) {
                    continue;
                }

                let cell_min = self.origin + cell.as_vec2() * self.cell_size;
                let cell_max = cell_min + Vec2::splat(self.cell_size);

                if min.x < cell_max.x && max.x > cell_min.x && min.y < cell_max.y && max.y > cell_min.y {
                    return true;
                }
            }
        }

        false
    }
}

impl TileLookup for DigTilemap {
    fn tile_at(&self, world_point: Vec3) -> bool {
        self.has_cell(self.world_to_cell(world_point.truncate()))
    }
}

/// Точка → центр единичной клетки по всем трём осям (floor + 0.5)
pub fn floor_to_tile_center(point: Vec3) -> Vec3 {
    point.floor() + Vec3::splat(0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_to_cell_negative() {
        let tilemap = DigTilemap::new(1.0);
        assert_eq!(tilemap.world_to_cell(Vec2::new(0.5, 0.5)), IVec2::new(0, 0));
        assert_eq!(tilemap.world_to_cell(Vec2::new(-0.5, -0.01)), IVec2::new(-1, -1));
        assert_eq!(tilemap.world_to_cell(Vec2::new(-1.0, 2.0)), IVec2::new(-1, 2));
    }

    #[test]
    fn test_tile_at() {
        let tilemap = DigTilemap::new(1.0).with_rect(IVec2::new(0, -3), IVec2::new(4, -1));
        assert_eq!(tilemap.len(), 15);

        assert!(tilemap.tile_at(Vec3::new(2.5, -1.5, 0.0)));
        assert!(!tilemap.tile_at(Vec3::new(2.5, 0.5, 0.0)));
        assert!(!tilemap.tile_at(Vec3::new(-0.5, -1.5, 0.0)));
    }

    #[test]
    fn test_floor_to_tile_center() {
        assert_eq!(
            floor_to_tile_center(Vec3::new(3.99, -0.01, 0.0)),
            Vec3::new(3.5, -0.5, 0.5)
        );
    }

    #[test]
    fn test_overlaps_box_ignores_touching() {
        let tilemap = DigTilemap::new(1.0).with_rect(IVec2::new(0, -1), IVec2::new(0, -1));

        // Box стоит ровно на верхней грани тайла
        assert!(!tilemap.overlaps_box(Vec2::new(0.5, 0.5), Vec2::new(0.8, 1.0)));
        // Чуть глубже: пересечение
        assert!(tilemap.overlaps_box(Vec2::new(0.5, 0.45), Vec2::new(0.8, 1.0)));
    }

    #[test]
    fn test_cell_center_with_origin() {
        let mut tilemap = DigTilemap::new(2.0);
        tilemap.origin = Vec2::new(10.0, 0.0);
        assert_eq!(tilemap.cell_center(IVec2::new(1, 0)), Vec2::new(13.0, 1.0));
        assert_eq!(tilemap.world_to_cell(Vec2::new(13.0, 1.0)), IVec2::new(1, 0));
    }
}
