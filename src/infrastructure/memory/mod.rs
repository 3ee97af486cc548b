//! Memory Layer - In-Memory State Management
//!
//! 实现 WorldManager, 管理打开中世界的内存状态

mod world_manager;

pub use world_manager::InMemoryWorldManager;
