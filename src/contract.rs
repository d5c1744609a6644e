//! # contract: interface to the remote content API
//!
//! This module defines the single seam between the pipeline and the
//! outside world: the [`ContentApi`] trait, covering both structured
//! content queries and raw media downloads.
//!
//! ## Interface & Extensibility
//! - Implement [`ContentApi`] to plug in a real HTTP client (see
//!   [`crate::remote::HttpContentApi`]) or a test double.
//! - All methods are async, returning results with a boxed error type.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests (exported under the
//!   `test-export-mocks` feature).

use async_trait::async_trait;

/// Error type for content API operations (simple boxed error for now).
pub type ApiError = Box<dyn std::error::Error + Send + Sync>;

/// Async access to the remote CMS: JSON content queries and media bytes.
///
/// Implementors own transport and authentication details; the trait is
/// agnostic of both. A non-2xx response is an `Err`, never a silent body.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// GET one content query and return the raw JSON body text verbatim.
    ///
    /// `fetch_path` is the schema entry's API query, e.g.
    /// `/products?filters[type][$eq]=Clutch&populate=*`.
    async fn fetch_json(&self, fetch_path: &str) -> Result<String, ApiError>;

    /// GET a media asset by absolute URL and return the full body bytes.
    async fn fetch_media(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}
