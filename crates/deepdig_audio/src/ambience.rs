//! Ambience + music: depth параметр по высоте игрока
//!
//! Lifecycle instances:
//! - Startup: create + start для overworld ambience, cave ambience, music
//! - каждые 0.5s: y игрока → clamp [-256, 32] → `PlayerDepth` на всех instances
//! - AppExit: stop + release всех instances
//!
//! Нет игрока → ошибка логируется один раз, depth update пропускается.

use bevy::prelude::*;
use deepdig_simulation::controller::Player;
use deepdig_simulation::logger::{log, log_error};
use serde::{Deserialize, Serialize};

use crate::backend::{AmbienceTrack, AudioBackendHandle, InstanceId};
use crate::error::AudioError;

/// Tunables ambience подсистемы
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbienceConfig {
    /// Период обновления depth параметра (секунды)
    pub depth_update_interval: f32,
    pub depth_min: f32,
    pub depth_max: f32,
    pub parameter_name: String,
}

impl Default for AmbienceConfig {
    fn default() -> Self {
        Self {
            depth_update_interval: 0.5,
            depth_min: -256.0,
            depth_max: 32.0,
            parameter_name: "PlayerDepth".to_string(),
        }
    }
}

/// Высота игрока → значение depth параметра
pub fn clamp_depth(y: f32, config: &AmbienceConfig) -> f32 {
    y.clamp(config.depth_min, config.depth_max)
}

/// Живые instances + таймер depth update
#[derive(Resource, Debug)]
pub struct AmbienceState {
    pub instances: Vec<(AmbienceTrack, InstanceId)>,
    pub depth_timer: Timer,
    /// Ошибка "нет listener'а" уже залогирована
    pub listener_missing_reported: bool,
}

impl AmbienceState {
    pub fn new(config: &AmbienceConfig) -> Self {
        Self {
            instances: Vec::new(),
            depth_timer: Timer::from_seconds(config.depth_update_interval.max(0.01), TimerMode::Repeating),
            listener_missing_reported: false,
        }
    }
}

/// Startup система: создать и запустить все долгие треки
pub fn start_ambience(backend: Res<AudioBackendHandle>, mut state: ResMut<AmbienceState>) {
    for track in AmbienceTrack::ALL {
        let instance = match backend.0.create_instance(track) {
            Ok(instance) => instance,
            Err(error) => {
                log_error(&format!("❌ Failed to create {:?}: {}", track, error));
                continue;
            }
        };

        // Instance уже создан: трекаем даже если start не прошёл (release нужен всё равно)
        state.instances.push((track, instance));

        if let Err(error) = backend.0.start(instance) {
            log_error(&format!("❌ Failed to start {:?}: {}", track, error));
        }
    }

    log(&format!("🎵 Ambience started: {} instance(s)", state.instances.len()));
}

/// Система: каждые `depth_update_interval` выставить depth параметр
pub fn update_depth_parameter(
    time: Res<Time>,
    config: Res<AmbienceConfig>,
    backend: Res<AudioBackendHandle>,
    mut state: ResMut<AmbienceState>,
    players: Query<&Transform, With<Player>>,
) {
    state.depth_timer.tick(time.delta());
    if !state.depth_timer.just_finished() {
        return;
    }

    let Ok(transform) = players.single() else {
        if !state.listener_missing_reported {
            log_error(&format!("❌ {}", AudioError::ListenerMissing));
            state.listener_missing_reported = true;
        }
        return;
    };

    let depth = clamp_depth(transform.translation.y, &config);

    for (track, instance) in &state.instances {
        if let Err(error) = backend.0.set_parameter(*instance, &config.parameter_name, depth) {
            log_error(&format!("❌ Failed to set depth on {:?}: {}", track, error));
        }
    }
}

/// Система: на AppExit остановить и освободить все instances
pub fn release_on_exit(
    mut exits: EventReader<AppExit>,
    backend: Res<AudioBackendHandle>,
    mut state: ResMut<AmbienceState>,
) {
    if exits.read().next().is_none() {
        return;
    }

    for (track, instance) in state.instances.drain(..) {
        if let Err(error) = backend.0.stop_and_release(instance) {
            log_error(&format!("❌ Failed to release {:?}: {}", track, error));
        }
    }
}
