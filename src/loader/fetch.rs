//! Cached, coalesced fragment retrieval.
//!
//! The transport is blocking (libcurl), so each network fetch runs in
//! `spawn_blocking` inside a spawned task that outlives any individual caller:
//! once a retrieval starts it runs to completion and its result is published
//! through a `watch` channel to every caller awaiting that path. The state
//! mutex is never held across an await; the completion handler removes the
//! in-flight entry and fills the cache in one critical section before it
//! publishes, so no caller can observe a settled result with a stale table.

use std::sync::Arc;

use tokio::sync::watch;

use super::{FetchSlot, FragmentLoader};
use crate::error::{RetrievalError, RetrievalErrorKind};

impl FragmentLoader {
    /// Retrieve a fragment's markup.
    ///
    /// Cache hits return immediately. If a fetch for `path` is already in
    /// flight the same pending result is awaited; otherwise a new retrieval
    /// starts. Failures are never cached: the next call retries from scratch.
    pub async fn fetch_fragment(&self, path: &str) -> Result<String, RetrievalError> {
        self.fetch_with(path, true).await
    }

    /// Warm the cache ahead of anticipated need. Never touches a document.
    pub async fn preload(&self, path: &str) -> Result<String, RetrievalError> {
        self.fetch_with(path, true).await
    }

    pub(crate) async fn fetch_with(
        &self,
        path: &str,
        use_cache: bool,
    ) -> Result<String, RetrievalError> {
        let mut rx = {
            let mut state = self.state.lock().unwrap();
            if use_cache {
                if let Some(html) = state.cache.get(path) {
                    tracing::trace!(%path, "fragment cache hit");
                    return Ok(html.clone());
                }
            }
            if let Some(rx) = state.in_flight.get(path) {
                tracing::debug!(%path, "joining in-flight fragment request");
                rx.clone()
            } else {
                let url = self.resolve(path)?;
                let (tx, rx) = watch::channel(None);
                state.in_flight.insert(path.to_string(), rx.clone());
                self.spawn_fetch(path.to_string(), url, use_cache, tx);
                rx
            }
        };

        loop {
            let settled: FetchSlot = rx.borrow_and_update().clone();
            if let Some(result) = settled {
                return result;
            }
            if rx.changed().await.is_err() {
                // Fetch task died without publishing (runtime shutdown).
                return Err(RetrievalError {
                    path: path.to_string(),
                    kind: RetrievalErrorKind::Transport(
                        "fragment request abandoned".to_string(),
                    ),
                });
            }
        }
    }

    fn spawn_fetch(&self, path: String, url: String, use_cache: bool, tx: watch::Sender<FetchSlot>) {
        let transport = Arc::clone(&self.transport);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let fetched = tokio::task::spawn_blocking({
                let transport = Arc::clone(&transport);
                let url = url.clone();
                move || transport.get(&url)
            })
            .await;

            let result: Result<String, RetrievalError> = match fetched {
                Ok(Ok(html)) => Ok(html),
                Ok(Err(err)) => Err(RetrievalError {
                    path: path.clone(),
                    kind: err.into(),
                }),
                Err(join) => Err(RetrievalError {
                    path: path.clone(),
                    kind: RetrievalErrorKind::Transport(join.to_string()),
                }),
            };

            let mut state = state.lock().unwrap();
            state.in_flight.remove(&path);
            match &result {
                Ok(html) => {
                    if use_cache {
                        state.cache.insert(path.clone(), html.clone());
                    }
                    tracing::debug!(%path, bytes = html.len(), "fragment fetched");
                }
                Err(err) => tracing::warn!(%path, error = %err, "fragment fetch failed"),
            }
            let _ = tx.send(Some(result));
        });
    }
}
