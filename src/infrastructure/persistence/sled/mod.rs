//! Sled Persistence - Sled 键值存储实现

mod cue_store;
mod world_store;

pub use cue_store::{SledCueStore, SledCueStoreConfig};
pub use world_store::SledWorldStore;
