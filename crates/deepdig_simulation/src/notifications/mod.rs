//! Notification bus: Jump / Walk / Climb / Dig
//!
//! Четыре независимых слота, каждый: один producer (контроллер), N observers.
//!
//! Гарантии:
//! - fire синхронный: все observers отработали до возврата из `fire`
//! - observers вызываются в порядке регистрации
//! - fire без observers: no-op
//! - между разными kinds порядок не гарантируется
//!
//! Bus не хранит ссылок на player entity: observer получает payload по значению.

use bevy::prelude::*;

/// Payload уведомления (value type, без identity)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Notification {
    pub position: Vec3,
    pub magnitude: f32,
}

impl Notification {
    pub fn new(position: Vec3, magnitude: f32) -> Self {
        Self {
            position,
            magnitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Jump,
    Walk,
    Climb,
    Dig,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::Jump,
        NotificationKind::Walk,
        NotificationKind::Climb,
        NotificationKind::Dig,
    ];
}

/// Handle для отписки observer'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

pub type Observer = Box<dyn Fn(Notification) + Send + Sync>;

/// Один слот: упорядоченный список observers
#[derive(Default)]
pub struct NotificationSlot {
    observers: Vec<(ObserverId, Observer)>,
}

impl NotificationSlot {
    pub fn fire(&self, notification: Notification) {
        for (_, observer) in &self.observers {
            observer(notification);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

/// Bus всех четырёх kinds (Resource, один на мир)
#[derive(Resource, Default)]
pub struct NotificationBus {
    jump: NotificationSlot,
    walk: NotificationSlot,
    climb: NotificationSlot,
    dig: NotificationSlot,
    next_id: u64,
}

impl NotificationBus {
    pub fn slot(&self, kind: NotificationKind) -> &NotificationSlot {
        match kind {
            NotificationKind::Jump => &self.jump,
            NotificationKind::Walk => &self.walk,
            NotificationKind::Climb => &self.climb,
            NotificationKind::Dig => &self.dig,
        }
    }

    fn slot_mut(&mut self, kind: NotificationKind) -> &mut NotificationSlot {
        match kind {
            NotificationKind::Jump => &mut self.jump,
            NotificationKind::Walk => &mut self.walk,
            NotificationKind::Climb => &mut self.climb,
            NotificationKind::Dig => &mut self.dig,
        }
    }

    /// Зарегистрировать observer (вызывается после уже зарегистрированных)
    pub fn subscribe<F>(&mut self, kind: NotificationKind, observer: F) -> ObserverId
    where
        F: Fn(Notification) + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.slot_mut(kind).observers.push((id, Box::new(observer)));
        id
    }

    /// Удалить observer; `false` если такого нет в слоте
    pub fn unsubscribe(&mut self, kind: NotificationKind, id: ObserverId) -> bool {
        let slot = self.slot_mut(kind);
        let before = slot.observers.len();
        slot.observers.retain(|(observer_id, _)| *observer_id != id);
        slot.observers.len() != before
    }

    pub fn fire(&self, kind: NotificationKind, notification: Notification) {
        self.slot(kind).fire(notification);
    }
}
