//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod catalog;
pub mod memory;
pub mod persistence;

pub use catalog::{
    HttpCatalogSource, HttpCatalogSourceConfig, JsonFileCatalogSource, StaticCatalogSource,
};
pub use memory::InMemoryWorldManager;
pub use persistence::sled::{SledCueStore, SledWorldStore};
