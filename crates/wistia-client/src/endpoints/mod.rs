//! Resource accessors
//!
//! Each module wraps one family of Wistia endpoints on top of the generic
//! verbs of [`ApiClient`].
//!
//! | Module | Endpoint | Description |
//! |--------|----------|-------------|
//! | `medias` | `medias` | Media (video, audio, image) listing |

pub mod medias;

pub use medias::{MediaFilters, MediasApi, SortDirection};

use crate::client::ApiClient;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Every resource family the client can hand out an accessor for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `medias` endpoints
    Medias,
}

impl ResourceKind {
    /// All known kinds
    pub const ALL: [Self; 1] = [Self::Medias];

    /// Resource name, which is also its base target path
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Medias => "medias",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resource accessor that can be cached by [`ResourceRegistry`]
pub trait Resource: Send + Sync + Sized + 'static {
    /// Kind this accessor serves
    const KIND: ResourceKind;

    /// Build the accessor around an API client
    fn new(client: ApiClient) -> Self;

    /// The registry slot holding the cached instance
    fn slot(registry: &ResourceRegistry) -> &OnceLock<Arc<Self>>;
}

/// One lazily filled slot per [`ResourceKind`]
#[derive(Default)]
pub struct ResourceRegistry {
    pub(crate) medias: OnceLock<Arc<MediasApi>>,
}

impl ResourceRegistry {
    /// Whether the accessor for `kind` has been created
    #[must_use]
    pub fn is_loaded(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Medias => self.medias.get().is_some(),
        }
    }
}
