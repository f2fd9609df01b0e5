//! Lecture catalog loading.
//!
//! The catalog is large and rarely changes, so each partition is fetched at
//! most once per session no matter how often the search flow asks for it.

mod cache;
mod client;
mod error;
mod types;

pub use cache::{CachedFetch, FetchHandle};
pub use client::{CatalogClient, CatalogConfig};
pub use error::CatalogError;
pub use types::{Lecture, TimeSlot};

use futures::future::try_join;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Produces the full lecture catalog exactly once per session.
///
/// Owns one single-flight cell per partition. Repeated calls to
/// [`all_lectures`](CatalogLoader::all_lectures) never re-issue a request;
/// callers that race the first fetch all await the same in-flight handles.
pub struct CatalogLoader {
    majors: CachedFetch<Arc<Vec<Lecture>>, CatalogError>,
    liberal_arts: CachedFetch<Arc<Vec<Lecture>>, CatalogError>,
    merged: OnceLock<Arc<Vec<Lecture>>>,
}

impl CatalogLoader {
    /// Creates a loader backed by the HTTP client.
    pub fn new(client: CatalogClient) -> Self {
        let client = Arc::new(client);
        let majors_client = Arc::clone(&client);
        let liberal_client = client;

        Self::from_sources(
            move || {
                let client = Arc::clone(&majors_client);
                async move { client.fetch_majors().await.map(Arc::new) }
            },
            move || {
                let client = Arc::clone(&liberal_client);
                async move { client.fetch_liberal_arts().await.map(Arc::new) }
            },
        )
    }

    /// Creates a loader from arbitrary partition sources.
    ///
    /// Tests inject counting fetchers here; production goes through
    /// [`CatalogLoader::new`].
    pub fn from_sources<FM, FL, FutM, FutL>(majors: FM, liberal_arts: FL) -> Self
    where
        FM: Fn() -> FutM + Send + Sync + 'static,
        FL: Fn() -> FutL + Send + Sync + 'static,
        FutM: Future<Output = Result<Arc<Vec<Lecture>>, CatalogError>> + Send + 'static,
        FutL: Future<Output = Result<Arc<Vec<Lecture>>, CatalogError>> + Send + 'static,
    {
        Self {
            majors: CachedFetch::new(majors),
            liberal_arts: CachedFetch::new(liberal_arts),
            merged: OnceLock::new(),
        }
    }

    /// Returns the merged catalog: majors partition order followed by
    /// liberal-arts order, never re-sorted.
    ///
    /// If either partition fetch fails, the error is surfaced and no partial
    /// catalog is ever produced. The failure is permanent for this loader
    /// (the single-flight handles are kept).
    pub async fn all_lectures(&self) -> Result<Arc<Vec<Lecture>>, CatalogError> {
        let (majors, liberal_arts) =
            try_join(self.majors.fetch(), self.liberal_arts.fetch()).await?;

        if let Some(merged) = self.merged.get() {
            return Ok(Arc::clone(merged));
        }

        let mut all = Vec::with_capacity(majors.len() + liberal_arts.len());
        all.extend_from_slice(&majors);
        all.extend_from_slice(&liberal_arts);
        info!(total = all.len(), "merged lecture catalog");

        let merged = self.merged.get_or_init(|| Arc::new(all));
        Ok(Arc::clone(merged))
    }
}
