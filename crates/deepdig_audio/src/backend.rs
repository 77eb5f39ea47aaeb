//! Audio engine boundary
//!
//! `AudioBackend`: то, что адаптер просит у движка: one-shot по позиции,
//! долгие instances (ambience / music) с параметрами и явным release.
//! Backend передаётся плагину при создании (`AudioBackendHandle`), глобального синглтона нет.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use deepdig_simulation::logger::log;

use crate::error::AudioError;

/// One-shot звуки
///
/// Первые четыре мапятся на notifications контроллера, остальные
/// приходят через `AudioRequest` / `TorchPlaced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Footsteps,
    Climbing,
    Digging,
    Jump,
    Land,
    ItemPlace,
    PageTurn,
}

/// Долгие треки (живут всё время работы приложения)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmbienceTrack {
    OverworldAmbience,
    CaveAmbience,
    Music,
}

impl AmbienceTrack {
    pub const ALL: [AmbienceTrack; 3] = [
        AmbienceTrack::OverworldAmbience,
        AmbienceTrack::CaveAmbience,
        AmbienceTrack::Music,
    ];
}

/// Handle долгого instance, выданный backend'ом
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(pub u64);

/// Контракт audio движка
///
/// Вызывается синхронно из bus observers и систем, поэтому `&self` + `Send + Sync`:
/// реализация сама решает, как синхронизировать своё состояние.
pub trait AudioBackend: Send + Sync {
    fn play_one_shot(&self, cue: SoundCue, position: Vec3) -> Result<(), AudioError>;
    fn create_instance(&self, track: AmbienceTrack) -> Result<InstanceId, AudioError>;
    fn start(&self, instance: InstanceId) -> Result<(), AudioError>;
    fn set_parameter(&self, instance: InstanceId, name: &str, value: f32) -> Result<(), AudioError>;
    /// Остановить немедленно и освободить; после этого id невалиден
    fn stop_and_release(&self, instance: InstanceId) -> Result<(), AudioError>;
}

/// Injected backend (shared между observers и системами)
#[derive(Resource, Clone)]
pub struct AudioBackendHandle(pub Arc<dyn AudioBackend>);

/// Вызов backend'а (запись для headless хоста / тестов)
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    OneShot { cue: SoundCue, position: Vec3 },
    Created { instance: InstanceId, track: AmbienceTrack },
    Started(InstanceId),
    Parameter { instance: InstanceId, name: String, value: f32 },
    Released(InstanceId),
}

#[derive(Default)]
struct HeadlessState {
    next_id: u64,
    live: HashMap<InstanceId, AmbienceTrack>,
    calls: Vec<AudioCall>,
}

/// Backend без звука: логирует и записывает вызовы
#[derive(Default)]
pub struct HeadlessAudioBackend {
    state: Mutex<HeadlessState>,
}

impl HeadlessAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<AudioCall> {
        self.state
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    pub fn live_instances(&self) -> usize {
        self.state.lock().map(|state| state.live.len()).unwrap_or(0)
    }

    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut HeadlessState) -> Result<T, AudioError>,
    ) -> Result<T, AudioError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| AudioError::Backend("headless backend state poisoned".into()))?;
        f(&mut *state)
    }
}

impl AudioBackend for HeadlessAudioBackend {
    fn play_one_shot(&self, cue: SoundCue, position: Vec3) -> Result<(), AudioError> {
        log(&format!("🔊 {:?} at {:?}", cue, position));
        self.with_state(|state| {
            state.calls.push(AudioCall::OneShot { cue, position });
            Ok(())
        })
    }

    fn create_instance(&self, track: AmbienceTrack) -> Result<InstanceId, AudioError> {
        self.with_state(|state| {
            let instance = InstanceId(state.next_id);
            state.next_id += 1;
            state.live.insert(instance, track);
            state.calls.push(AudioCall::Created { instance, track });
            Ok(instance)
        })
    }

    fn start(&self, instance: InstanceId) -> Result<(), AudioError> {
        self.with_state(|state| {
            if !state.live.contains_key(&instance) {
                return Err(AudioError::UnknownInstance(instance));
            }
            state.calls.push(AudioCall::Started(instance));
            Ok(())
        })
    }

    fn set_parameter(&self, instance: InstanceId, name: &str, value: f32) -> Result<(), AudioError> {
        self.with_state(|state| {
            if !state.live.contains_key(&instance) {
                return Err(AudioError::UnknownInstance(instance));
            }
            state.calls.push(AudioCall::Parameter {
                instance,
                name: name.to_string(),
                value,
            });
            Ok(())
        })
    }

    fn stop_and_release(&self, instance: InstanceId) -> Result<(), AudioError> {
        self.with_state(|state| {
            state
                .live
                .remove(&instance)
                .ok_or(AudioError::UnknownInstance(instance))?;
            state.calls.push(AudioCall::Released(instance));
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_lifecycle() {
        let backend = HeadlessAudioBackend::new();

        let music = backend.create_instance(AmbienceTrack::Music).unwrap();
        backend.start(music).unwrap();
        backend.set_parameter(music, "PlayerDepth", -10.0).unwrap();
        assert_eq!(backend.live_instances(), 1);

        backend.stop_and_release(music).unwrap();
        assert_eq!(backend.live_instances(), 0);

        // Released id больше не валиден
        assert_eq!(
            backend.set_parameter(music, "PlayerDepth", 0.0),
            Err(AudioError::UnknownInstance(music))
        );
        assert_eq!(
            backend.stop_and_release(music),
            Err(AudioError::UnknownInstance(music))
        );
    }

    #[test]
    fn test_ids_are_unique() {
        let backend = HeadlessAudioBackend::new();
        let a = backend.create_instance(AmbienceTrack::CaveAmbience).unwrap();
        let b = backend.create_instance(AmbienceTrack::CaveAmbience).unwrap();
        assert_ne!(a, b);
    }
}
