//! DEEPDIG Simulation Core
//!
//! ECS-симуляция игрока на Bevy 0.16: movement & action state machine
//! для 2D копателя (coyote jump, climb, dig по tier инструмента, факелы, stamina).
//!
//! Архитектура:
//! - ECS = состояние контроллера, inventory, правила действий
//! - Host = input устройство, animator, audio (через `NotificationBus`), рендер
//! - Physics backend подключается plugin'ом: `RapierSensingPlugin` или `HeadlessPhysicsPlugin`

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod collision_layers;
pub mod controller;
pub mod inventory;
pub mod logger;
pub mod notifications;
pub mod physics;
pub mod scripted;
pub mod tools;
pub mod world;

// Re-export основных типов
pub use controller::{
    spawn_player, AimHighlight, AnimationCallback, AnimationCue, ControllerConfig, Facing, Player,
    PlayerController, PlayerControllerPlugin, PlayerControllerSet, PlayerInput, PlayerInputEvent,
    PeriodicActions, RunBoostIntent,
};
pub use inventory::{Inventory, LedgerError, ResourceLedger, STAMINA_POTION_AMOUNT};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter,
};
pub use notifications::{Notification, NotificationBus, NotificationKind, ObserverId};
pub use physics::{HeadlessPhysicsPlugin, PhysicsQuery, PlayerBody, RapierSensingPlugin, SensorReadings};
pub use tools::{CurrentTool, EquipToolIntent, Tool};
pub use world::{DigTilemap, TileLookup, Torch, TorchPlaced};

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Physics backend не включён: хост выбирает сам.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed от create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для physics step
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_plugins(PlayerControllerPlugin);
    }
}

/// Seeded RNG для scripted input (soak binary, determinism тесты)
#[derive(Resource)]
pub struct DeterministicRng {
    pub seed: u64,
    pub rng: ChaCha8Rng,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Self { seed, rng }
    }
}

/// Headless App без physics backend'а и рендера
///
/// Logger ставится console по умолчанию (если хост ещё не подставил свой).
pub fn create_headless_app(seed: u64) -> App {
    init_logger();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(DeterministicRng::new(seed));
    app.insert_resource(Time::<Fixed>::from_hz(60.0));
    app
}

/// Байтовый snapshot всех компонентов `T` (entity index + Debug форма)
///
/// Entity сортируются по index: порядок archetype итерации не участвует в сравнении.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut rows: Vec<(u32, String)> = world
        .query::<(Entity, &T)>()
        .iter(world)
        .map(|(entity, component)| (entity.index(), format!("{:?}", component)))
        .collect();
    rows.sort_by_key(|(index, _)| *index);

    rows.into_iter()
        .flat_map(|(index, debug)| {
            let mut bytes = index.to_le_bytes().to_vec();
            bytes.extend_from_slice(debug.as_bytes());
            bytes
        })
        .collect()
}
