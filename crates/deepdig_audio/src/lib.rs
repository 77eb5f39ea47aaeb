//! DEEPDIG Audio Adapter
//!
//! Переводит notifications контроллера в звук и ведёт ambience по глубине игрока.
//!
//! Архитектура:
//! - `triggers`: подписка на `NotificationBus`, notification → one-shot; Land / ItemPlace / PageTurn
//! - `ambience`: overworld / cave / music instances + `PlayerDepth` параметр
//! - `backend`: контракт audio движка (`AudioBackend`), headless реализация для тестов
//!
//! Backend инжектится через `AudioPlugin::new`, глобального audio синглтона нет.

use std::sync::Arc;

use bevy::prelude::*;
use deepdig_simulation::notifications::NotificationBus;
use deepdig_simulation::world::TorchPlaced;

pub mod ambience;
pub mod backend;
pub mod error;
pub mod triggers;

pub use ambience::{clamp_depth, AmbienceConfig, AmbienceState};
pub use backend::{
    AmbienceTrack, AudioBackend, AudioBackendHandle, AudioCall, HeadlessAudioBackend, InstanceId,
    SoundCue,
};
pub use error::AudioError;
pub use triggers::{
    play_item_place, play_land, play_page_turn, should_play, subscribe_audio_triggers, AudioRequest,
    AudioSubscriptions,
};

/// Audio plugin (ставится рядом с `SimulationPlugin`)
pub struct AudioPlugin {
    pub backend: Arc<dyn AudioBackend>,
    pub config: AmbienceConfig,
}

impl AudioPlugin {
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            backend,
            config: AmbienceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AmbienceConfig) -> Self {
        self.config = config;
        self
    }
}

impl Plugin for AudioPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(AudioBackendHandle(self.backend.clone()))
            .insert_resource(AmbienceState::new(&self.config))
            .insert_resource(self.config.clone())
            .init_resource::<AudioSubscriptions>()
            .init_resource::<NotificationBus>()
            .add_event::<AudioRequest>()
            .add_event::<TorchPlaced>()
            .add_systems(
                Startup,
                (triggers::register_audio_triggers, ambience::start_ambience),
            )
            .add_systems(Update, ambience::update_depth_parameter)
            .add_systems(PostUpdate, triggers::play_requested_sounds)
            .add_systems(Last, ambience::release_on_exit);
    }
}
