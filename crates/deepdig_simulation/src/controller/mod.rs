//! Player movement & action controller
//!
//! ECS ответственность:
//! - Intent capture (Update): aim, dig, torch, potion, coyote / jump edges
//! - Physics step (FixedUpdate): jump impulse, walk, climb override, facing
//! - Throttled periodic actions: stamina drain, Walk / Climb notifications
//!
//! Host ответственность:
//! - Input device → `PlayerInputEvent`
//! - Animator: читает `AnimationCue`, отвечает `AnimationCallback`
//! - Physics backend: `HeadlessPhysicsPlugin` или `RapierSensingPlugin`
//!
//! Порядок фаз:
//! - Update: `Sense` → `Capture` → `Integrate`
//! - FixedUpdate: `Sense` → `Resolve` → `Integrate`

use bevy::prelude::*;

pub mod animation;
pub mod capture;
pub mod config;
pub mod input;
pub mod periodic;
pub mod physics_step;
pub mod state;


pub use animation::{AnimationCallback, AnimationCue};
pub use config::ControllerConfig;
pub use input::{PlayerInput, PlayerInputEvent};
pub use periodic::PeriodicActions;
pub use physics_step::{resolve_physics_step, StepOutcome};
pub use state::{DigPhase, Facing, JumpPhase, Locomotion, PlayerController};

use crate::inventory::Inventory;
use crate::notifications::NotificationBus;
use crate::physics::{PlayerBody, SensorReadings};
use crate::tools::{process_equip_tool, CurrentTool, EquipToolIntent};
use crate::world::TorchPlaced;

/// Фазы контроллера (physics backends встраиваются в `Sense` / `Integrate`)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerControllerSet {
    /// Backend обновляет `SensorReadings` (и тянет velocity из движка)
    Sense,
    /// Per-frame intent capture (Update)
    Capture,
    /// Physics step (FixedUpdate)
    Resolve,
    /// Backend забирает velocity / интегрирует тело
    Integrate,
}

/// Marker component для player entity
///
/// Всё остальное состояние контроллера подтягивается через required components.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(
    Transform,
    ControllerConfig,
    PlayerController,
    PlayerInput,
    PlayerBody,
    SensorReadings,
    CurrentTool,
    Inventory,
    PeriodicActions,
    AimHighlight
)]
pub struct Player;

/// Highlight тайла под прицелом (presentation читает и рисует)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AimHighlight {
    pub visible: bool,
    /// Центр тайла (валиден только при `visible`)
    pub position: Vec3,
}

impl AimHighlight {
    pub fn hidden() -> Self {
        Self::default()
    }
}

/// Event: run boost (walk speed *= `run_boost_multiplier`)
#[derive(Event, Debug, Clone, Copy)]
pub struct RunBoostIntent {
    pub entity: Entity,
}

/// Spawn игрока с заданными tunables
///
/// Config проходит `validated()`, таймеры строятся из него.
pub fn spawn_player(commands: &mut Commands, position: Vec3, config: ControllerConfig) -> Entity {
    let config = config.validated();
    let timers = PeriodicActions::from_config(&config);

    commands
        .spawn((Player, Transform::from_translation(position), config, timers))
        .id()
}

/// Controller Plugin
///
/// Capture порядок (Update, `.chain()`):
/// 1. apply_input_events: PlayerInputEvent → PlayerInput
/// 2. handle_animation_callbacks: impact frame / конец удара
/// 3. process_equip_tool, process_run_boost
/// 4. aim_look → start_dig → use_torch → use_stamina_potion → movement_intent
/// 5. tick_periodic_actions
/// 6. consume_input_edges
///
/// Resolve (FixedUpdate): apply_physics_step
///
/// PreUpdate: init_player_tunables (config + таймеры для новых игроков)
pub struct PlayerControllerPlugin;

impl Plugin for PlayerControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerInputEvent>()
            .add_event::<AnimationCue>()
            .add_event::<AnimationCallback>()
            .add_event::<RunBoostIntent>()
            .add_event::<EquipToolIntent>()
            .add_event::<TorchPlaced>()
            .init_resource::<NotificationBus>()
            .register_type::<PlayerController>()
            .register_type::<ControllerConfig>()
            .register_type::<PlayerInput>()
            .register_type::<AimHighlight>();

        app.configure_sets(
            Update,
            (
                PlayerControllerSet::Sense,
                PlayerControllerSet::Capture,
                PlayerControllerSet::Integrate,
            )
                .chain(),
        )
        .configure_sets(
            FixedUpdate,
            (
                PlayerControllerSet::Sense,
                PlayerControllerSet::Resolve,
                PlayerControllerSet::Integrate,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                input::apply_input_events,
                animation::handle_animation_callbacks,
                process_equip_tool,
                capture::process_run_boost,
                capture::aim_look,
                capture::start_dig,
                capture::use_torch,
                capture::use_stamina_potion,
                capture::movement_intent,
                periodic::tick_periodic_actions,
                input::consume_input_edges,
            )
                .chain()
                .in_set(PlayerControllerSet::Capture),
        )
        .add_systems(
            FixedUpdate,
            physics_step::apply_physics_step.in_set(PlayerControllerSet::Resolve),
        )
        // PreUpdate: до первого FixedUpdate шага нового игрока
        .add_systems(PreUpdate, periodic::init_player_tunables);
    }
}
