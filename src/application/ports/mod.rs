//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod catalog_source;
mod cue_store;
mod world_manager;
mod world_store;

pub use catalog_source::{CatalogSourceError, CatalogSourcePort};
pub use cue_store::{CueClip, CueStoreError, CueStorePort, CueStoreStats};
pub use world_manager::{WorldError, WorldManagerPort, WorldSession};
pub use world_store::{StoreError, WorldSnapshot, WorldStorePort};
