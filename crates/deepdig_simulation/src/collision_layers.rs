//! Collision Layers Constants
//!
//! Centralised bit masks для sensor queries (ground / climb / aim).
//!
//! ## Layers:
//! - Layer 1 (0b1 = 1): Player body
//! - Layer 2 (0b10 = 2): Ground (solid terrain, в т.ч. стены для climb)
//! - Layer 3 (0b100 = 4): Diggable tiles (цель aim raycast)
//! - Layer 4 (0b1000 = 8): Torches (pickup overlap)
//!
//! Rapier adapter конвертирует маску в `Group` через `from_bits_truncate`.

/// Bit mask слоёв коллизий
pub type LayerMask = u32;

/// Layer 1: Player body
pub const COLLISION_LAYER_PLAYER: LayerMask = 0b1;

/// Layer 2: Ground / solid terrain
pub const COLLISION_LAYER_GROUND: LayerMask = 0b10;

/// Layer 3: Diggable tilemap colliders
pub const COLLISION_LAYER_DIGGABLE: LayerMask = 0b100;

/// Layer 4: Placed torches
pub const COLLISION_LAYER_TORCH: LayerMask = 0b1000;

/// Mask: ground check + climb check (diggable тайлы тоже твёрдые)
pub const COLLISION_MASK_GROUND: LayerMask = COLLISION_LAYER_GROUND | COLLISION_LAYER_DIGGABLE;

/// Mask: aim raycast (только то, что можно копать)
pub const COLLISION_MASK_DIG: LayerMask = COLLISION_LAYER_DIGGABLE;

/// Название слоя для debug логов
pub fn get_layer_name(layer_bits: LayerMask) -> &'static str {
    match layer_bits {
        COLLISION_LAYER_PLAYER => "Player",
        COLLISION_LAYER_GROUND => "Ground",
        COLLISION_LAYER_DIGGABLE => "Diggable",
        COLLISION_LAYER_TORCH => "Torch",
        _ => "Unknown",
    }
}
