//! Low-priority cache warming.
//!
//! A background worker drains queued paths one at a time, so prefetching
//! never competes with on-demand loads for connections. Failures are logged
//! and dropped; a path that failed to prefetch simply fetches on demand later.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::loader::FragmentLoader;

pub struct PrefetchQueue {
    tx: mpsc::UnboundedSender<String>,
    worker: JoinHandle<()>,
}

impl PrefetchQueue {
    /// Start the worker. Must be called from within a tokio runtime.
    pub fn spawn(loader: Arc<FragmentLoader>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let worker = tokio::spawn(async move {
            while let Some(path) = rx.recv().await {
                match loader.preload(&path).await {
                    Ok(_) => tracing::debug!(%path, "prefetched fragment"),
                    Err(err) => tracing::warn!(%path, error = %err, "prefetch failed"),
                }
            }
        });
        Self { tx, worker }
    }

    /// Queue a path for warming. Returns false if the worker has stopped.
    pub fn enqueue(&self, path: &str) -> bool {
        self.tx.send(path.to_string()).is_ok()
    }

    /// Let the worker drain the remaining queue, then stop it.
    pub async fn shutdown(self) {
        drop(self.tx);
        let _ = self.worker.await;
    }
}
