//! World data: dig tilemap + placed torches

pub mod tilemap;
pub mod torch;

pub use tilemap::{floor_to_tile_center, DigTilemap, TileLookup};
pub use torch::{spawn_torch, torches_in_box, Torch, TorchPlaced};
