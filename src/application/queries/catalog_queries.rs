//! Catalog Queries

/// 获取单个配音身份详情查询
#[derive(Debug, Clone)]
pub struct GetVoiceIdentity {
    pub base_identity: String,
}

/// 列出目录中所有配音身份查询
#[derive(Debug, Clone)]
pub struct ListVoiceIdentities;
