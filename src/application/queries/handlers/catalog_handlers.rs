//! Catalog Query Handlers

use std::sync::Arc;

use crate::application::catalog_loader::CatalogLoader;
use crate::application::error::ApplicationError;
use crate::application::queries::{GetVoiceIdentity, ListVoiceIdentities};
use crate::domain::voice::VoiceGroup;

// ============================================================================
// Response DTOs
// ============================================================================

/// 配音身份详情响应
#[derive(Debug, Clone)]
pub struct VoiceIdentityResponse {
    pub base_identity: String,
    pub gender: String,
    pub age_band: String,
    pub style_tags: Vec<String>,
    pub emotions: Vec<String>,
}

impl From<&VoiceGroup> for VoiceIdentityResponse {
    fn from(group: &VoiceGroup) -> Self {
        Self {
            base_identity: group.base_identity().to_string(),
            gender: group.gender().label().to_string(),
            age_band: group.age_band().label().to_string(),
            style_tags: group.style_tags().iter().cloned().collect(),
            emotions: group.emotion_map().keys().cloned().collect(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetVoiceIdentity Handler
pub struct GetVoiceIdentityHandler {
    catalog_loader: Arc<CatalogLoader>,
}

impl GetVoiceIdentityHandler {
    pub fn new(catalog_loader: Arc<CatalogLoader>) -> Self {
        Self { catalog_loader }
    }

    pub async fn handle(&self, query: GetVoiceIdentity) -> Result<VoiceIdentityResponse, ApplicationError> {
        let catalog = self.catalog_loader.load().await;
        let group = catalog
            .get(&query.base_identity)
            .ok_or_else(|| ApplicationError::not_found("Voice identity", &query.base_identity))?;

        Ok(VoiceIdentityResponse::from(group))
    }
}

/// ListVoiceIdentities Handler
pub struct ListVoiceIdentitiesHandler {
    catalog_loader: Arc<CatalogLoader>,
}

impl ListVoiceIdentitiesHandler {
    pub fn new(catalog_loader: Arc<CatalogLoader>) -> Self {
        Self { catalog_loader }
    }

    pub async fn handle(&self, _query: ListVoiceIdentities) -> Result<Vec<VoiceIdentityResponse>, ApplicationError> {
        let catalog = self.catalog_loader.load().await;
        Ok(catalog.groups().iter().map(VoiceIdentityResponse::from).collect())
    }
}
