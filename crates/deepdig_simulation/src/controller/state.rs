//! Player controller state (tagged, без boolean flag soup)
//!
//! # Transition table
//!
//! **JumpPhase**
//! - `Idle | Rising` --jump-down && coyote > 0--> `Requested` (coyote = 0)
//! - `Requested` --physics step--> `Rising` (impulse + Jump notification)
//! - `Rising` --jump-up--> `Idle` (vy > 0 → vy * 0.5)
//!
//! **DigPhase**
//! - `Ready` --dig held--> `Swinging` (dig animation cue)
//! - `Swinging` --`AnimationCallback::DigAnimationEnded`--> `Ready`
//!
//! **Locomotion** (пересчитывается каждый physics step из сенсоров)
//! - ground hit → `Grounded`
//! - climb hit && !ground → `Climbing`
//! - иначе → `Airborne`
//!
//! Grounded и Climbing взаимоисключающие по построению.

use bevy::prelude::*;

/// Куда смотрит персонаж (climb sensor пробует в эту сторону)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// +1.0 вправо, -1.0 влево
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum Locomotion {
    #[default]
    Grounded,
    Airborne,
    Climbing,
}

impl Locomotion {
    pub fn resolve(grounded: bool, climb_contact: bool) -> Self {
        match (grounded, climb_contact) {
            (true, _) => Locomotion::Grounded,
            (false, true) => Locomotion::Climbing,
            (false, false) => Locomotion::Airborne,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum JumpPhase {
    #[default]
    Idle,
    /// Jump принят в этом frame, ждёт physics step (бывший `shouldJump`)
    Requested,
    /// Импульс применён, кнопка ещё не отпущена (бывший `isJumping`)
    Rising,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum DigPhase {
    #[default]
    Ready,
    /// Анимация удара идёт; прервать нельзя, закрывает только animation callback
    Swinging,
}

/// Состояние контроллера игрока
///
/// Мутируется только системами контроллера.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerController {
    pub facing: Facing,
    pub locomotion: Locomotion,
    pub jump: JumpPhase,
    pub dig: DigPhase,
    /// Оставшееся coyote окно (секунды), 0 ≤ counter ≤ coyote_time
    pub coyote_time_counter: f32,
    /// Последняя точка aim raycast (центр тайла)
    pub look_position: Vec3,
    /// Moving флаг последнего physics step
    pub moving: bool,
    /// Run boost (1.0 = без буста)
    pub speed_multiplier: f32,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            facing: Facing::Right,
            locomotion: Locomotion::Grounded,
            jump: JumpPhase::Idle,
            dig: DigPhase::Ready,
            coyote_time_counter: 0.0,
            look_position: Vec3::ZERO,
            moving: false,
            speed_multiplier: 1.0,
        }
    }
}

impl PlayerController {
    pub fn should_jump(&self) -> bool {
        self.jump == JumpPhase::Requested
    }

    pub fn is_jumping(&self) -> bool {
        self.jump == JumpPhase::Rising
    }

    pub fn is_climbing(&self) -> bool {
        self.locomotion == Locomotion::Climbing
    }

    pub fn is_digging(&self) -> bool {
        self.dig == DigPhase::Swinging
    }

    pub fn is_facing_right(&self) -> bool {
        self.facing == Facing::Right
    }

    /// Coyote counter: reset на земле, иначе убывает до 0
    pub fn update_coyote(&mut self, grounded: bool, coyote_time: f32, delta: f32) {
        if grounded {
            self.coyote_time_counter = coyote_time;
        } else {
            self.coyote_time_counter = (self.coyote_time_counter - delta).max(0.0);
        }
    }

    /// Jump-down edge: принимается только пока coyote окно открыто
    ///
    /// Принятие обнуляет окно: повторное нажатие в воздухе не пройдёт.
    pub fn try_accept_jump(&mut self) -> bool {
        if self.coyote_time_counter <= 0.0 {
            return false;
        }

        self.jump = JumpPhase::Requested;
        self.coyote_time_counter = 0.0;
        true
    }

    /// Physics step забирает запрос прыжка (ровно один раз)
    pub fn take_jump_request(&mut self) -> bool {
        if self.jump != JumpPhase::Requested {
            return false;
        }

        self.jump = JumpPhase::Rising;
        true
    }

    /// Jump-up edge (variable jump height)
    ///
    /// Возвращает новую vy если подъём был обрезан; `Rising` → `Idle` в любом случае.
    pub fn release_jump(&mut self, vertical_velocity: f32) -> Option<f32> {
        if self.jump != JumpPhase::Rising {
            return None;
        }

        self.jump = JumpPhase::Idle;
        (vertical_velocity > 0.0).then_some(vertical_velocity * 0.5)
    }

    /// Dig held: `true` если начали новый удар
    pub fn begin_dig(&mut self) -> bool {
        if self.dig == DigPhase::Swinging {
            return false;
        }

        self.dig = DigPhase::Swinging;
        true
    }

    /// Animation end callback
    pub fn end_dig(&mut self) -> bool {
        let was_digging = self.is_digging();
        self.dig = DigPhase::Ready;
        was_digging
    }

    /// Разворот по горизонтальному input; `true` если facing изменился
    pub fn update_facing(&mut self, horizontal: f32, deadzone: f32) -> bool {
        let facing = if horizontal > deadzone {
            Facing::Right
        } else if horizontal < -deadzone {
            Facing::Left
        } else {
            return false;
        };

        let changed = self.facing != facing;
        self.facing = facing;
        changed
    }

    pub fn activate_run_boost(&mut self, multiplier: f32) {
        self.speed_multiplier *= multiplier;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locomotion_resolve() {
        assert_eq!(Locomotion::resolve(true, true), Locomotion::Grounded);
        assert_eq!(Locomotion::resolve(false, true), Locomotion::Climbing);
        assert_eq!(Locomotion::resolve(false, false), Locomotion::Airborne);
    }

    #[test]
    fn test_coyote_counter_bounded_and_monotonic() {
        let mut controller = PlayerController::default();
        let coyote_time = 0.2;

        controller.update_coyote(true, coyote_time, 0.016);
        assert_eq!(controller.coyote_time_counter, coyote_time);

        let mut previous = controller.coyote_time_counter;
        for _ in 0..30 {
            controller.update_coyote(false, coyote_time, 0.016);
            assert!(controller.coyote_time_counter <= previous);
            assert!(controller.coyote_time_counter <= coyote_time);
            previous = controller.coyote_time_counter;
        }
        assert_eq!(controller.coyote_time_counter, 0.0);

        controller.update_coyote(true, coyote_time, 0.016);
        assert_eq!(controller.coyote_time_counter, coyote_time);
    }

    #[test]
    fn test_jump_accepted_once_per_coyote_window() {
        let mut controller = PlayerController::default();
        controller.update_coyote(true, 0.2, 0.016);

        assert!(controller.try_accept_jump());
        assert!(controller.should_jump());
        assert_eq!(controller.coyote_time_counter, 0.0);

        // Второе нажатие до приземления
        controller.update_coyote(false, 0.2, 0.016);
        assert!(!controller.try_accept_jump());
    }

    #[test]
    fn test_coyote_jump_after_leaving_ground() {
        let mut controller = PlayerController::default();
        controller.update_coyote(true, 0.2, 0.016);
        controller.update_coyote(false, 0.2, 0.1); // 0.1s в воздухе

        assert!(controller.try_accept_jump());
    }

    #[test]
    fn test_take_jump_request_once() {
        let mut controller = PlayerController::default();
        controller.coyote_time_counter = 0.2;
        controller.try_accept_jump();

        assert!(controller.take_jump_request());
        assert!(!controller.should_jump());
        assert!(controller.is_jumping());
        assert!(!controller.take_jump_request());
    }

    #[test]
    fn test_release_jump_halves_once() {
        let mut controller = PlayerController {
            jump: JumpPhase::Rising,
            ..default()
        };

        assert_eq!(controller.release_jump(6.0), Some(3.0));
        assert!(!controller.is_jumping());

        // Второй release: без эффекта
        assert_eq!(controller.release_jump(3.0), None);
    }

    #[test]
    fn test_release_jump_while_falling_only_clears() {
        let mut controller = PlayerController {
            jump: JumpPhase::Rising,
            ..default()
        };

        assert_eq!(controller.release_jump(-2.0), None);
        assert_eq!(controller.jump, JumpPhase::Idle);
    }

    #[test]
    fn test_dig_is_uninterruptible() {
        let mut controller = PlayerController::default();

        assert!(controller.begin_dig());
        assert!(!controller.begin_dig()); // Уже копаем
        assert!(controller.is_digging());

        assert!(controller.end_dig());
        assert!(!controller.end_dig());
        assert!(controller.begin_dig());
    }

    #[test]
    fn test_facing_deadzone() {
        let mut controller = PlayerController::default();

        assert!(!controller.update_facing(0.005, 0.01));
        assert!(controller.is_facing_right());

        assert!(controller.update_facing(-0.5, 0.01));
        assert_eq!(controller.facing, Facing::Left);
        assert_eq!(controller.facing.sign(), -1.0);

        assert!(!controller.update_facing(-0.005, 0.01)); // В deadzone: остаёмся Left
        assert_eq!(controller.facing, Facing::Left);
    }

    #[test]
    fn test_run_boost_stacks() {
        let mut controller = PlayerController::default();
        controller.activate_run_boost(1.25);
        controller.activate_run_boost(1.25);
        assert!((controller.speed_multiplier - 1.5625).abs() < 1e-6);
    }
}
