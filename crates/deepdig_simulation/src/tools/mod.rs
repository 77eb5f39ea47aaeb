//! Digging tools: immutable stats + equip lifecycle
//!
//! Architecture:
//! - `Tool`: value type (tier, damage, range, energy cost), никогда не мутируется
//! - `CurrentTool`: component на игроке, swap = простая замена значения
//! - `EquipToolIntent`: event (inventory UI / pickup / debug) → `process_equip_tool`

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::logger::log_info;

/// Статы инструмента для копания
///
/// - `tier` выбирает анимацию копания и какие материалы поддаются
/// - `damage` уходит в Dig notification (урон по тайлу)
/// - `range` ограничивает aim raycast
/// - `energy_consumption` списывается со stamina на каждый удар
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct Tool {
    pub tier: u8,
    pub damage: f32,
    pub range: f32,
    pub energy_consumption: f32,
}

impl Default for Tool {
    fn default() -> Self {
        Self::wooden_shovel()
    }
}

impl Tool {
    pub fn new(tier: u8, damage: f32, range: f32, energy_consumption: f32) -> Self {
        Self {
            tier,
            damage,
            range,
            energy_consumption,
        }
    }

    /// Стартовый инструмент
    pub fn wooden_shovel() -> Self {
        Self::new(1, 1.0, 1.5, 1.0)
    }

    pub fn stone_pickaxe() -> Self {
        Self::new(2, 2.0, 2.0, 1.5)
    }

    pub fn iron_pickaxe() -> Self {
        Self::new(3, 4.0, 2.5, 2.0)
    }

    pub fn diamond_drill() -> Self {
        Self::new(4, 8.0, 3.0, 3.0)
    }
}

/// Текущий инструмент игрока
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CurrentTool(pub Tool);

impl CurrentTool {
    /// Заменить инструмент, вернуть предыдущий
    pub fn equip(&mut self, tool: Tool) -> Tool {
        std::mem::replace(&mut self.0, tool)
    }
}

/// Equip инструмента (swap текущего)
#[derive(Event, Debug, Clone, Copy)]
pub struct EquipToolIntent {
    pub entity: Entity,
    pub tool: Tool,
}

/// Система: обработка EquipToolIntent
pub fn process_equip_tool(
    mut events: EventReader<EquipToolIntent>,
    mut tools: Query<&mut CurrentTool>,
) {
    for intent in events.read() {
        let Ok(mut current) = tools.get_mut(intent.entity) else {
            continue;
        };

        let previous = current.equip(intent.tool);
        log_info(&format!(
            "🔧 Entity {:?} equipped tier {} tool (was tier {})",
            intent.entity, intent.tool.tier, previous.tier
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_tiers_scale_up() {
        let tiers = [
            Tool::wooden_shovel(),
            Tool::stone_pickaxe(),
            Tool::iron_pickaxe(),
            Tool::diamond_drill(),
        ];

        for pair in tiers.windows(2) {
            assert!(pair[1].tier > pair[0].tier);
            assert!(pair[1].damage > pair[0].damage);
            assert!(pair[1].range >= pair[0].range);
        }
    }

    #[test]
    fn test_equip_returns_previous() {
        let mut current = CurrentTool::default();
        assert_eq!(current.0.tier, 1);

        let previous = current.equip(Tool::iron_pickaxe());
        assert_eq!(previous, Tool::wooden_shovel());
        assert_eq!(current.0.tier, 3);
    }
}
