//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod casting_commands;
mod cue_commands;
mod scene_commands;
mod world_commands;

pub mod handlers;

pub use casting_commands::*;
pub use cue_commands::*;
pub use scene_commands::*;
pub use world_commands::*;
