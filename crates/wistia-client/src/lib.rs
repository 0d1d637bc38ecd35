//! Minimal client for the Wistia video-hosting REST API
//!
//! Requests are authenticated with HTTP basic auth (`api` / your API
//! password), every target path gets the configured format extension
//! (`medias` becomes `medias.json`), and JSON responses are decoded into
//! [`serde_json::Value`].
//!
//! # Example
//!
//! ```rust,no_run
//! use wistia_client::{Params, WistiaClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WistiaClient::new("your-api-password")?;
//!
//!     // List media through the cached accessor
//!     let medias = client.medias().index(&Params::new()).await?;
//!     println!("{medias:#}");
//!
//!     // Or call any endpoint directly
//!     match client.get("projects", &Params::new()).await {
//!         Ok(projects) => println!("{projects}"),
//!         Err(e) if e.is_client_error() => println!("rejected: {:?}", e.descriptor()),
//!         Err(e) => return Err(e.into()),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod query;

pub use client::{ApiClient, WistiaClient};
pub use config::{ClientConfig, Format};
pub use error::{ApiError, ApiResult, ErrorDescriptor};

/// Request parameters: query pairs for GET/DELETE, JSON body for POST/PUT
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::{ApiClient, WistiaClient};
    pub use crate::config::{ClientConfig, Format};
    pub use crate::endpoints::{MediaFilters, MediasApi, Resource, ResourceKind, SortDirection};
    pub use crate::error::{ApiError, ApiResult, ErrorDescriptor};
    pub use crate::Params;
}
