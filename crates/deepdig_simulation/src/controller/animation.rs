//! Animation boundary: cues наружу, callbacks внутрь
//!
//! Animator живёт у хоста. Контроллер:
//! - пишет `AnimationCue` (trigger jump / dig, moving / climbing флаги)
//! - читает `AnimationCallback` (impact frame удара, конец анимации удара)

use bevy::prelude::*;

use super::state::PlayerController;
use crate::inventory::{Inventory, ResourceLedger};
use crate::logger::{log, log_warning};
use crate::notifications::{Notification, NotificationBus, NotificationKind};
use crate::tools::CurrentTool;

/// Event: команда animator'у хоста
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum AnimationCue {
    /// Прыжок принят (coyote window)
    Jump { entity: Entity },
    /// Начало удара; анимация выбирается по tier инструмента
    Dig { entity: Entity, tier: u8 },
    /// Публикуется каждый physics step
    Moving { entity: Entity, moving: bool },
    /// Публикуется каждый physics step
    Climbing { entity: Entity, climbing: bool },
}

/// Event: callback от animator'а хоста
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCallback {
    /// Кадр удара: блок ломается здесь
    DigImpactFrame { entity: Entity },
    /// Анимация удара доиграла
    DigAnimationEnded { entity: Entity },
}

/// Impact frame: Dig notification + списание энергии инструмента
///
/// Срабатывает на каждый impact frame, фаза удара не проверяется.
/// Notification уходит даже если stamina не хватило (списание не гейтит удар).
/// Возвращает `false` если энергию списать не удалось.
pub fn apply_dig_impact(
    controller: &PlayerController,
    tool: &CurrentTool,
    ledger: &mut impl ResourceLedger,
    bus: &NotificationBus,
) -> bool {
    bus.fire(
        NotificationKind::Dig,
        Notification::new(controller.look_position, tool.0.damage),
    );

    if !ledger.remove_stamina(tool.0.energy_consumption) {
        log_warning(&format!(
            "⚠️ Not enough stamina for dig: need {:.1}, have {:.1}",
            tool.0.energy_consumption,
            ledger.stamina()
        ));
        return false;
    }

    true
}

/// Система: обработка AnimationCallback
pub fn handle_animation_callbacks(
    mut callbacks: EventReader<AnimationCallback>,
    mut players: Query<(&mut PlayerController, &CurrentTool, &mut Inventory)>,
    bus: Res<NotificationBus>,
) {
    for callback in callbacks.read() {
        match *callback {
            AnimationCallback::DigImpactFrame { entity } => {
                let Ok((controller, tool, mut inventory)) = players.get_mut(entity) else {
                    continue;
                };

                if !controller.is_digging() {
                    log(&format!("Entity {:?}: dig impact frame outside swing", entity));
                }
                apply_dig_impact(&controller, tool, &mut *inventory, &bus);
            }
            AnimationCallback::DigAnimationEnded { entity } => {
                if let Ok((mut controller, _, _)) = players.get_mut(entity) {
                    controller.end_dig();
                }
            }
        }
    }
}
