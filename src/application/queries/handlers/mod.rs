//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod catalog_handlers;
mod world_handlers;

pub use catalog_handlers::*;
pub use world_handlers::*;
