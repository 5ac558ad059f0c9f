//! Error types for fragment retrieval and insertion.

use thiserror::Error;

/// A fragment could not be retrieved from the network.
///
/// `Clone` because the in-flight table broadcasts one result to every caller
/// awaiting the same path.
#[derive(Debug, Clone, Error)]
#[error("failed to retrieve {path}: {kind}")]
pub struct RetrievalError {
    /// The fragment path as given by the caller (the cache key).
    pub path: String,
    pub kind: RetrievalErrorKind,
}

#[derive(Debug, Clone, Error)]
pub enum RetrievalErrorKind {
    /// The server answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u32),
    /// Network-level failure (DNS, connection, abandoned request, ...).
    #[error("{0}")]
    Transport(String),
    /// The path could not be resolved against the configured base origin.
    #[error("invalid fragment path: {0}")]
    InvalidPath(String),
}

impl From<crate::transport::TransportError> for RetrievalErrorKind {
    fn from(err: crate::transport::TransportError) -> Self {
        match err {
            crate::transport::TransportError::Status(code) => RetrievalErrorKind::Status(code),
            crate::transport::TransportError::Network(msg) => RetrievalErrorKind::Transport(msg),
        }
    }
}

/// Error returned by `load`/`reload`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    /// The insertion target selector did not resolve to a live node.
    #[error("target element not found: {selector}")]
    TargetNotFound { selector: String },
    /// A caller-supplied lifecycle hook failed.
    #[error("{hook} hook failed: {source}")]
    Hook {
        hook: &'static str,
        source: anyhow::Error,
    },
}
