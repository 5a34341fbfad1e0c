//! Memoized Protocol Clients
//!
//! Some adapters need an expensive client before their first call: the SOAP
//! adapter fetches and parses a WSDL document, the gRPC adapter loads a proto
//! descriptor and opens a channel. [`ClientCache`] builds such a client at most
//! once per key and hands out shared references afterwards.
//!
//! # Guarantees
//!
//! - **Single flight**: concurrent callers asking for the same key while the
//!   client is being built wait for that one build instead of starting their own.
//! - **Immutable after construction**: entries are `Arc<T>` and never replaced,
//!   so readers need no further synchronization.
//! - **Failed builds are not cached**: the next caller retries the build.
//!
//! # Usage
//!
//! ```rust,ignore
//! let cache: Arc<ClientCache<WsdlClient>> = Arc::new(ClientCache::new());
//! let client = cache
//!     .get_or_try_build(&wsdl_url, || WsdlClient::fetch(&http, &wsdl_url))
//!     .await?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::OnceCell;

/// Keyed, lazily-built, single-flight cache of shared clients
pub struct ClientCache<T> {
    entries: Mutex<HashMap<String, Arc<OnceCell<Arc<T>>>>>,
}

impl<T> ClientCache<T> {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the client for `key`, building it with `build` on first use
    ///
    /// # Errors
    ///
    /// Returns the builder's error. Nothing is stored in that case.
    pub async fn get_or_try_build<E, F, Fut>(&self, key: &str, build: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cell = {
            let mut entries = self.lock();
            entries.entry(key.to_string()).or_default().clone()
        };

        cell.get_or_try_init(|| async { build().await.map(Arc::new) })
            .await
            .cloned()
    }

    /// Returns the client for `key` if it has already been built
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.lock().get(key).and_then(|cell| cell.get().cloned())
    }

    /// Number of fully built clients
    pub fn len(&self) -> usize {
        self.lock().values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<OnceCell<Arc<T>>>>> {
        // The map only holds cells; a panic elsewhere cannot leave it inconsistent.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Default for ClientCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ClientCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.lock().keys().cloned().collect();
        f.debug_struct("ClientCache").field("keys", &keys).finish()
    }
}
