//! Notification → one-shot звук
//!
//! Walk / Climb с magnitude ≤ 0 не звучат (стоим / сползаем), Jump / Dig звучат всегда.
//! Land / PageTurn хост просит через `AudioRequest`, ItemPlace играет на `TorchPlaced`.

use std::sync::Arc;

use bevy::prelude::*;
use deepdig_simulation::controller::Player;
use deepdig_simulation::logger::{log, log_error};
use deepdig_simulation::notifications::{Notification, NotificationBus, NotificationKind, ObserverId};
use deepdig_simulation::world::TorchPlaced;

use crate::backend::{AudioBackend, AudioBackendHandle, SoundCue};
use crate::error::AudioError;

impl SoundCue {
    pub fn for_notification(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Jump => SoundCue::Jump,
            NotificationKind::Walk => SoundCue::Footsteps,
            NotificationKind::Climb => SoundCue::Climbing,
            NotificationKind::Dig => SoundCue::Digging,
        }
    }
}

/// Нужно ли играть звук для notification
pub fn should_play(kind: NotificationKind, notification: &Notification) -> bool {
    match kind {
        NotificationKind::Walk | NotificationKind::Climb => notification.magnitude > 0.0,
        NotificationKind::Jump | NotificationKind::Dig => true,
    }
}

/// Подписки адаптера на bus (для отписки при замене backend'а)
#[derive(Resource, Debug, Default)]
pub struct AudioSubscriptions(pub Vec<(NotificationKind, ObserverId)>);

/// Подписать backend на все четыре вида notifications
pub fn subscribe_audio_triggers(
    bus: &mut NotificationBus,
    backend: Arc<dyn AudioBackend>,
) -> Vec<(NotificationKind, ObserverId)> {
    NotificationKind::ALL
        .iter()
        .map(|&kind| {
            let backend = backend.clone();
            let id = bus.subscribe(kind, move |notification| {
                if !should_play(kind, &notification) {
                    return;
                }

                let cue = SoundCue::for_notification(kind);
                if let Err(error) = backend.play_one_shot(cue, notification.position) {
                    log_error(&format!("❌ Failed to play {:?}: {}", cue, error));
                }
            });
            (kind, id)
        })
        .collect()
}

/// Startup система: подписка injected backend'а
pub fn register_audio_triggers(
    mut bus: ResMut<NotificationBus>,
    backend: Res<AudioBackendHandle>,
    mut subscriptions: ResMut<AudioSubscriptions>,
) {
    let ids = subscribe_audio_triggers(&mut bus, backend.0.clone());
    subscriptions.0.extend(ids);
}

/// Звуки вне notification bus (UI, приземление)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum AudioRequest {
    Land { position: Vec3, force: f32 },
    /// Звучит в позиции игрока
    PageTurn,
}

/// Приземление в точке контакта
pub fn play_land(backend: &dyn AudioBackend, position: Vec3, force: f32) -> Result<(), AudioError> {
    log(&format!("🦶 Land at {:?} (force {:.1})", position, force));
    backend.play_one_shot(SoundCue::Land, position)
}

/// Предмет поставлен (позиция игрока)
pub fn play_item_place(backend: &dyn AudioBackend, listener: Vec3) -> Result<(), AudioError> {
    backend.play_one_shot(SoundCue::ItemPlace, listener)
}

/// Перелистывание страницы (позиция игрока)
pub fn play_page_turn(backend: &dyn AudioBackend, listener: Vec3) -> Result<(), AudioError> {
    backend.play_one_shot(SoundCue::PageTurn, listener)
}

/// Система: `TorchPlaced` + `AudioRequest` → one-shots
pub fn play_requested_sounds(
    mut placed: EventReader<TorchPlaced>,
    mut requests: EventReader<AudioRequest>,
    backend: Res<AudioBackendHandle>,
    players: Query<&Transform, With<Player>>,
) {
    let backend = backend.0.as_ref();

    for event in placed.read() {
        if let Err(error) = play_item_place(backend, event.position) {
            log_error(&format!("❌ Failed to play {:?}: {}", SoundCue::ItemPlace, error));
        }
    }

    for request in requests.read() {
        let result = match *request {
            AudioRequest::Land { position, force } => play_land(backend, position, force),
            AudioRequest::PageTurn => players
                .single()
                .map_err(|_| AudioError::ListenerMissing)
                .and_then(|transform| play_page_turn(backend, transform.translation)),
        };

        if let Err(error) = result {
            log_error(&format!("❌ Failed to play {:?}: {}", request, error));
        }
    }
}
