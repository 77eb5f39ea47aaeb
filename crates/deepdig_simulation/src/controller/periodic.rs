//! Throttled periodic actions: свои таймеры, независимо от frame / physics rate
//!
//! - stamina drain: каждые `stamina_drain_interval` (1s) списать `stamina_drain_amount`
//! - movement tick: каждые `movement_tick_interval` (0.6s) Walk или Climb notification
//!
//! Таймеры живут в компоненте игрока и умирают вместе с entity.

use bevy::prelude::*;

use super::config::ControllerConfig;
use super::state::PlayerController;
use super::Player;
use crate::inventory::{Inventory, ResourceLedger};
use crate::logger::log_warning;
use crate::notifications::{Notification, NotificationBus, NotificationKind};
use crate::physics::{PlayerBody, SensorReadings};

/// Repeating таймеры периодических действий
#[derive(Component, Debug, Clone)]
pub struct PeriodicActions {
    pub stamina_drain: Timer,
    pub movement_tick: Timer,
}

impl PeriodicActions {
    pub fn from_config(config: &ControllerConfig) -> Self {
        let interval = |seconds: f32| seconds.max(ControllerConfig::MIN_INTERVAL);

        Self {
            stamina_drain: Timer::from_seconds(
                interval(config.stamina_drain_interval),
                TimerMode::Repeating,
            ),
            movement_tick: Timer::from_seconds(
                interval(config.movement_tick_interval),
                TimerMode::Repeating,
            ),
        }
    }
}

impl Default for PeriodicActions {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}

/// Система (PreUpdate): новый игрок получает validated config и таймеры из него
///
/// Покрывает spawn `Player` в обход `spawn_player` (required `PeriodicActions`
/// иначе строится из default config).
pub fn init_player_tunables(
    mut players: Query<(&mut ControllerConfig, &mut PeriodicActions), Added<Player>>,
) {
    for (mut config, mut timers) in players.iter_mut() {
        let validated = config.clone().validated();
        *timers = PeriodicActions::from_config(&validated);
        *config = validated;
    }
}

/// Пассивный drain; `false` если stamina не хватило (ничего не списано)
pub fn drain_stamina(ledger: &mut impl ResourceLedger, amount: f32) -> bool {
    ledger.remove_stamina(amount)
}

/// Movement tick: Climb (приоритет) или Walk, никогда оба
pub fn movement_notification(
    controller: &PlayerController,
    readings: &SensorReadings,
    body: &PlayerBody,
    position: Vec3,
) -> Option<(NotificationKind, Notification)> {
    if controller.is_climbing() {
        let climb = Notification::new(position, body.velocity.y.max(0.0));
        return Some((NotificationKind::Climb, climb));
    }

    let speed = body.speed();
    if readings.grounded && speed > 0.0 {
        return Some((NotificationKind::Walk, Notification::new(position, speed)));
    }

    None
}

/// Система: тикаем таймеры, выполняем сработавшие действия
///
/// Длинный frame может закрыть несколько интервалов: drain выполняется
/// за каждый, movement notification один раз (текущее состояние всё равно одно).
pub fn tick_periodic_actions(
    time: Res<Time>,
    bus: Res<NotificationBus>,
    mut players: Query<(
        Entity,
        &Transform,
        &ControllerConfig,
        &PlayerController,
        &SensorReadings,
        &PlayerBody,
        &mut Inventory,
        &mut PeriodicActions,
    )>,
) {
    let delta = time.delta();

    for (entity, transform, config, controller, readings, body, mut inventory, mut timers) in
        players.iter_mut()
    {
        timers.stamina_drain.tick(delta);
        for _ in 0..timers.stamina_drain.times_finished_this_tick() {
            if !drain_stamina(&mut *inventory, config.stamina_drain_amount) {
                log_warning(&format!("😮‍💨 Entity {:?} is out of stamina!", entity));
            }
        }

        timers.movement_tick.tick(delta);
        if timers.movement_tick.just_finished() {
            if let Some((kind, notification)) =
                movement_notification(controller, readings, body, transform.translation)
            {
                bus.fire(kind, notification);
            }
        }
    }
}
