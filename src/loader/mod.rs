//! Fragment loader: session cache, in-flight request coalescing, document
//! insertion with script re-materialization.
//!
//! All loader state lives for the session and is never persisted. The cache
//! maps a fragment path (the caller-supplied string, not the resolved URL) to
//! its markup and is unbounded: entries stay until `clear_cache` or a
//! `reload`. The in-flight table holds one pending fetch per path so that
//! concurrent callers share a single network request.

mod fetch;
mod load;
#[cfg(test)]
pub(crate) mod testutil;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use url::Url;

use crate::config::LoaderConfig;
use crate::error::{RetrievalError, RetrievalErrorKind};
use crate::transport::{CurlTransport, Transport};

/// One slot per in-flight path; `None` until the fetch task publishes.
type FetchSlot = Option<Result<String, RetrievalError>>;

struct LoaderState {
    cache: HashMap<String, String>,
    in_flight: HashMap<String, watch::Receiver<FetchSlot>>,
    loaded: HashSet<String>,
}

/// The loader. Construct one per page session and pass it by reference; the
/// fetch side (`fetch_fragment`/`preload`) is `Send` and may be driven from
/// spawned tasks, while `load` futures stay on the thread owning the document.
pub struct FragmentLoader {
    transport: Arc<dyn Transport>,
    base_url: Option<Url>,
    state: Arc<Mutex<LoaderState>>,
}

impl FragmentLoader {
    /// Loader backed by the real curl transport.
    pub fn new(config: LoaderConfig) -> Self {
        let transport = Arc::new(CurlTransport::from_config(&config));
        Self::with_transport(config, transport)
    }

    /// Loader with a caller-supplied transport (tests, instrumentation).
    pub fn with_transport(config: LoaderConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: config.base_url,
            state: Arc::new(Mutex::new(LoaderState {
                cache: HashMap::new(),
                in_flight: HashMap::new(),
                loaded: HashSet::new(),
            })),
        }
    }

    /// Empty the fragment cache unconditionally. In-flight requests are not
    /// affected; their results still land in the cache when they complete.
    pub fn clear_cache(&self) {
        self.state.lock().unwrap().cache.clear();
        tracing::debug!("fragment cache cleared");
    }

    /// True once `load`/`reload` has inserted this path at least once.
    pub fn is_loaded(&self, path: &str) -> bool {
        self.state.lock().unwrap().loaded.contains(path)
    }

    pub(crate) fn mark_loaded(&self, path: &str) {
        self.state.lock().unwrap().loaded.insert(path.to_string());
    }

    pub(crate) fn drop_cache_entry(&self, path: &str) {
        self.state.lock().unwrap().cache.remove(path);
    }

    /// Resolve a fragment path to the URL handed to the transport.
    fn resolve(&self, path: &str) -> Result<String, RetrievalError> {
        let invalid = |msg: String| RetrievalError {
            path: path.to_string(),
            kind: RetrievalErrorKind::InvalidPath(msg),
        };
        match &self.base_url {
            Some(base) => base
                .join(path)
                .map(String::from)
                .map_err(|e| invalid(e.to_string())),
            None => Url::parse(path)
                .map(String::from)
                .map_err(|e| invalid(format!("{} (no base_url configured)", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::loader_with;
    use crate::config::LoaderConfig;
    use crate::error::RetrievalErrorKind;
    use crate::loader::FragmentLoader;
    use crate::transport::Transport;
    use std::sync::Arc;

    #[tokio::test]
    async fn relative_path_without_base_is_invalid() {
        let transport = Arc::new(super::testutil::MockTransport::new());
        let loader = FragmentLoader::with_transport(
            LoaderConfig::default(),
            Arc::clone(&transport) as Arc<dyn Transport>,
        );
        let err = loader
            .fetch_fragment("/components/header.html")
            .await
            .unwrap_err();
        assert!(matches!(err.kind, RetrievalErrorKind::InvalidPath(_)));
        assert_eq!(transport.calls(), 0, "resolution fails before the network");
    }

    #[tokio::test]
    async fn clear_cache_forces_refetch() {
        let (loader, transport) = loader_with(&[("/c/a.html", "<p>a</p>")]);
        loader.fetch_fragment("/c/a.html").await.unwrap();
        loader.clear_cache();
        loader.fetch_fragment("/c/a.html").await.unwrap();
        assert_eq!(transport.calls(), 2);
    }
}
