//! Medias API endpoints
//!
//! GET /medias lists the media (videos, audio, images) in the account.

use super::{Resource, ResourceKind, ResourceRegistry};
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::Params;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, OnceLock};

/// Medias API interface
#[derive(Clone)]
pub struct MediasApi {
    client: ApiClient,
}

impl Resource for MediasApi {
    const KIND: ResourceKind = ResourceKind::Medias;

    fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn slot(registry: &ResourceRegistry) -> &OnceLock<Arc<Self>> {
        &registry.medias
    }
}

impl MediasApi {
    /// List media, forwarding `filters` as query parameters
    ///
    /// GET /medias.json
    pub async fn index(&self, filters: &Params) -> ApiResult<Value> {
        self.client.get(Self::KIND.name(), filters).await
    }

    /// List media using typed filters
    pub async fn index_with(&self, filters: &MediaFilters) -> ApiResult<Value> {
        self.index(&filters.to_params()).await
    }
}

/// Sort order accepted by the listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Oldest / A first
    Ascending,
    /// Newest / Z first
    Descending,
}

impl SortDirection {
    fn as_param(self) -> u8 {
        match self {
            Self::Ascending => 1,
            Self::Descending => 0,
        }
    }
}

/// Typed filters for listing media
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaFilters {
    /// Only media in this project
    pub project_id: Option<String>,
    /// Exact media name
    pub name: Option<String>,
    /// Media type, e.g. "Video", "Audio", "Image"
    pub media_type: Option<String>,
    /// Exact hashed ID
    pub hashed_id: Option<String>,
    /// Sort field: "name", "created" or "updated"
    pub sort_by: Option<String>,
    /// Sort direction
    pub sort_direction: Option<SortDirection>,
}

impl MediaFilters {
    /// Create empty filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by project
    #[must_use]
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Filter by name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Filter by media type
    #[must_use]
    pub fn with_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Filter by hashed ID
    #[must_use]
    pub fn with_hashed_id(mut self, hashed_id: impl Into<String>) -> Self {
        self.hashed_id = Some(hashed_id.into());
        self
    }

    /// Sort results
    #[must_use]
    pub fn sorted_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = Some(field.into());
        self.sort_direction = Some(direction);
        self
    }

    /// Convert to request parameters using the API's field names
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        let fields = [
            ("project_id", &self.project_id),
            ("name", &self.name),
            ("type", &self.media_type),
            ("hashed_id", &self.hashed_id),
            ("sort_by", &self.sort_by),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                params.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        if let Some(direction) = self.sort_direction {
            params.insert("sort_direction".to_string(), direction.as_param().into());
        }
        params
    }
}
