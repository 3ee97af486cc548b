//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod casting_handlers;
mod cue_handlers;
mod scene_handlers;
mod world_handlers;

pub use casting_handlers::*;
pub use cue_handlers::*;
pub use scene_handlers::*;
pub use world_handlers::*;
