//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod catalog_queries;
mod world_queries;

pub mod handlers;

pub use catalog_queries::*;
pub use world_queries::*;
