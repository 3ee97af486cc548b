//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（CatalogSource、WorldManager、WorldStore、CueStore）
//! - catalog_loader: 目录加载与记忆化
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod catalog_loader;
pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Casting commands
    CastVoiceCommand,
    CastVoiceResponse,
    SpeakLineCommand,
    SpeakLineResponse,
    // Cue commands
    CueOutcome,
    RequestCueCommand,
    RequestCueResponse,
    StoreCueCommand,
    StoreCueResponse,
    // Scene commands
    ClearAssetsCommand,
    ClearAssetsResponse,
    DecideAssetCommand,
    DecideAssetResponse,
    SaveAssetCommand,
    SaveAssetResponse,
    SaveVariationCommand,
    SaveVariationResponse,
    UpdateSceneCommand,
    UpdateSceneResponse,
    // World commands
    CloseWorldCommand,
    CloseWorldResponse,
    OpenWorldCommand,
    OpenWorldResponse,
    SweepWorldsCommand,
    SweepWorldsResponse,
    // Handlers
    handlers::{
        CastVoiceHandler, ClearAssetsHandler, CloseWorldHandler, DecideAssetHandler,
        OpenWorldHandler, RequestCueHandler, SaveAssetHandler, SaveVariationHandler,
        SpeakLineHandler, StoreCueHandler, SweepWorldsHandler, UpdateSceneHandler,
    },
};

pub use catalog_loader::CatalogLoader;
pub use error::ApplicationError;

pub use ports::{
    // Catalog source
    CatalogSourceError,
    CatalogSourcePort,
    // Cue store
    CueClip,
    CueStoreError,
    CueStorePort,
    CueStoreStats,
    // World manager
    WorldError,
    WorldManagerPort,
    WorldSession,
    // World store
    StoreError,
    WorldSnapshot,
    WorldStorePort,
};

pub use queries::{
    // Catalog queries
    GetVoiceIdentity,
    ListVoiceIdentities,
    // World queries
    GetAssetSummary,
    GetCastList,
    ListOpenWorlds,
    // Handlers
    handlers::{
        AssetSummaryResponse, CastEntryView, CastListResponse, GetAssetSummaryHandler,
        GetCastListHandler, GetVoiceIdentityHandler, ListOpenWorldsHandler,
        ListVoiceIdentitiesHandler, VoiceIdentityResponse, WorldSummaryResponse,
    },
};
