//! Single-flight memoization for the catalog fetches.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::OnceLock;

/// The shared handle every caller receives. Awaiting it yields a clone of
/// the one fetch result.
pub type FetchHandle<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

/// Memoizes a no-argument async fetch so it executes at most once for the
/// lifetime of the cache instance.
///
/// The first `get` creates the fetch future, wraps it in a shared handle and
/// stores that handle before the fetch completes. Every call — concurrent or
/// subsequent, before or after completion — returns the same handle.
///
/// There is no expiration and no invalidation. A failed fetch resolves all
/// waiters with a clone of the error, and the handle is kept, so the failure
/// is permanent for this instance.
pub struct CachedFetch<T, E> {
    fetch: Box<dyn Fn() -> BoxFuture<'static, Result<T, E>> + Send + Sync>,
    handle: OnceLock<FetchHandle<T, E>>,
}

impl<T, E> CachedFetch<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Wraps a fetch function.
    ///
    /// The function is not invoked here; it runs lazily on the first `get`.
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            fetch: Box::new(move || fetch().boxed()),
            handle: OnceLock::new(),
        }
    }

    /// Returns the shared result handle, starting the fetch if this is the
    /// first call.
    pub fn get(&self) -> FetchHandle<T, E> {
        self.handle
            .get_or_init(|| (self.fetch)().shared())
            .clone()
    }

    /// Convenience for `get().await`.
    pub async fn fetch(&self) -> Result<T, E> {
        self.get().await
    }

    /// Returns true if a fetch has been started (resolved or not).
    pub fn started(&self) -> bool {
        self.handle.get().is_some()
    }
}
