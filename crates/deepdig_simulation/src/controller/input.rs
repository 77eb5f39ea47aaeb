//! Player input: состояние устройства за текущий frame
//!
//! Хост (engine input layer, headless script, тест) пишет `PlayerInputEvent`,
//! контроллер сворачивает события в `PlayerInput` компонент на entity.
//!
//! Axes и held-кнопки: уровень (последнее значение побеждает).
//! Edge-кнопки (jump down/up, torch, potion): OR за frame, гасятся после capture.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    /// Горизонтальная ось [-1, 1]
    pub horizontal: f32,
    /// Вертикальная ось [-1, 1] (> 0 = лезть вверх)
    pub vertical: f32,
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub torch_pressed: bool,
    pub potion_pressed: bool,
    pub dig_held: bool,
    /// Aim point в world space (курсор); `None`: aim недоступен
    pub aim_point: Option<Vec2>,
}

impl PlayerInput {
    /// Влить кадр устройства: уровни заменяются, edges накапливаются
    pub fn merge(&mut self, frame: &PlayerInput) {
        self.horizontal = frame.horizontal.clamp(-1.0, 1.0);
        self.vertical = frame.vertical.clamp(-1.0, 1.0);
        self.dig_held = frame.dig_held;
        self.aim_point = frame.aim_point;

        self.jump_pressed |= frame.jump_pressed;
        self.jump_released |= frame.jump_released;
        self.torch_pressed |= frame.torch_pressed;
        self.potion_pressed |= frame.potion_pressed;
    }

    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.jump_released = false;
        self.torch_pressed = false;
        self.potion_pressed = false;
    }

    pub fn has_axis_input(&self) -> bool {
        self.horizontal != 0.0 || self.vertical != 0.0
    }
}

/// Event: кадр input устройства для конкретного игрока
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerInputEvent {
    pub entity: Entity,
    pub input: PlayerInput,
}

/// Система: PlayerInputEvent → PlayerInput (начало capture фазы)
pub fn apply_input_events(
    mut events: EventReader<PlayerInputEvent>,
    mut inputs: Query<&mut PlayerInput>,
) {
    for event in events.read() {
        let Ok(mut input) = inputs.get_mut(event.entity) else {
            continue;
        };
        input.merge(&event.input);
    }
}

/// Система: edges живут ровно один frame (конец capture фазы)
pub fn consume_input_edges(mut inputs: Query<&mut PlayerInput>) {
    for mut input in inputs.iter_mut() {
        input.clear_edges();
    }
}
