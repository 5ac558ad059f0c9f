//! Test doubles shared by loader unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use url::Url;

use crate::config::LoaderConfig;
use crate::loader::FragmentLoader;
use crate::transport::{Transport, TransportError};

/// Base origin the mock loader resolves paths against.
pub(crate) const BASE: &str = "http://site.test";

/// In-memory transport keyed by resolved URL, counting every GET. Unrouted
/// URLs answer 404.
pub(crate) struct MockTransport {
    calls: AtomicUsize,
    responses: Mutex<HashMap<String, Result<String, TransportError>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            responses: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_ok(&self, path: &str, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(format!("{}{}", BASE, path), Ok(body.to_string()));
    }

    pub fn set_err(&self, path: &str, err: TransportError) {
        self.responses
            .lock()
            .unwrap()
            .insert(format!("{}{}", BASE, path), Err(err));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or(Err(TransportError::Status(404)))
    }
}

/// Loader over a `MockTransport` preloaded with `routes` (path, body).
pub(crate) fn loader_with(routes: &[(&str, &str)]) -> (FragmentLoader, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    for (path, body) in routes {
        transport.set_ok(path, body);
    }
    let config = LoaderConfig::with_base(Url::parse(BASE).expect("static base url"));
    let loader =
        FragmentLoader::with_transport(config, Arc::clone(&transport) as Arc<dyn Transport>);
    (loader, transport)
}
