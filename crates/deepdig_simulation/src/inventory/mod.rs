//! Resource ledger: stamina + consumables (torches, stamina potions)
//!
//! Контроллер видит инвентарь только через `ResourceLedger` trait:
//! - remove может не пройти (недостаточно ресурса) → action просто не выполняется
//! - stamina никогда не уходит в минус (failed remove ничего не меняет)
//!
//! `Inventory`: дефолтная реализация (ECS component на player entity).

use bevy::prelude::*;

pub mod ledger;


pub use ledger::{LedgerError, ResourceLedger};

/// Сколько stamina даёт одно зелье
pub const STAMINA_POTION_AMOUNT: f32 = 200.0;

/// Инвентарь игрока (stamina + расходники)
///
/// Инвариант: stamina ≥ 0.0 (списание сверх остатка отклоняется целиком)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Inventory {
    pub stamina: f32,
    pub torches: u32,
    pub stamina_potions: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            stamina: 100.0,
            torches: 3,
            stamina_potions: 0,
        }
    }
}

impl Inventory {
    pub fn new(stamina: f32, torches: u32, stamina_potions: u32) -> Self {
        Self {
            stamina: stamina.max(0.0),
            torches,
            stamina_potions,
        }
    }

    /// Списать stamina с подробной причиной отказа
    pub fn try_remove_stamina(&mut self, amount: f32) -> Result<(), LedgerError> {
        if self.stamina < amount {
            return Err(LedgerError::InsufficientStamina {
                requested: amount,
                available: self.stamina,
            });
        }

        self.stamina -= amount;
        Ok(())
    }

    pub fn try_remove_torch(&mut self, count: u32) -> Result<(), LedgerError> {
        if self.torches < count {
            return Err(LedgerError::InsufficientTorches {
                requested: count,
                available: self.torches,
            });
        }

        self.torches -= count;
        Ok(())
    }
}

impl ResourceLedger for Inventory {
    fn stamina(&self) -> f32 {
        self.stamina
    }

    fn remove_stamina(&mut self, amount: f32) -> bool {
        self.try_remove_stamina(amount).is_ok()
    }

    fn add_stamina(&mut self, amount: f32) {
        self.stamina += amount.max(0.0);
    }

    fn has_potions(&self) -> bool {
        self.stamina_potions > 0
    }

    fn remove_potion(&mut self, count: u32) {
        self.stamina_potions = self.stamina_potions.saturating_sub(count);
    }

    fn add_torch(&mut self, count: u32) {
        self.torches = self.torches.saturating_add(count);
    }

    fn remove_torch(&mut self, count: u32) -> bool {
        self.try_remove_torch(count).is_ok()
    }

    fn has_torches(&self) -> bool {
        self.torches > 0
    }
}
