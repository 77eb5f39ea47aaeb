//! Ledger contract между контроллером и inventory subsystem.

/// Учёт ресурсов игрока (stamina, torches, stamina potions)
///
/// Контракт:
/// - `remove_stamina` / `remove_torch` возвращают `false` и НЕ меняют состояние при нехватке
/// - `remove_potion` молча насыщается в 0 (вызывается только после `has_potions`)
pub trait ResourceLedger {
    fn stamina(&self) -> f32;
    fn remove_stamina(&mut self, amount: f32) -> bool;
    fn add_stamina(&mut self, amount: f32);
    fn has_potions(&self) -> bool;
    fn remove_potion(&mut self, count: u32);
    fn add_torch(&mut self, count: u32);
    fn remove_torch(&mut self, count: u32) -> bool;
    fn has_torches(&self) -> bool;
}

/// Причина отказа при списании ресурса
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("insufficient stamina: requested {requested}, available {available}")]
    InsufficientStamina { requested: f32, available: f32 },

    #[error("insufficient torches: requested {requested}, available {available}")]
    InsufficientTorches { requested: u32, available: u32 },
}
