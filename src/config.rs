use std::time::Duration;
use url::Url;

/// Loader configuration. Purely programmatic: the loader persists nothing and
/// reads nothing from disk or the environment.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Base origin that relative fragment paths (e.g. `/components/header.html`)
    /// are resolved against. If `None`, paths must be absolute URLs.
    pub base_url: Option<Url>,
    /// Optional connect timeout applied at the transport. `None` = no limit.
    pub connect_timeout: Option<Duration>,
    /// Optional whole-request timeout applied at the transport. `None` = the
    /// loader never times out on its own; callers impose their own deadline.
    pub request_timeout: Option<Duration>,
    /// `Accept` header sent with every fragment request.
    pub accept: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            connect_timeout: None,
            request_timeout: None,
            accept: "text/html".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Config resolving relative fragment paths against `base_url`.
    pub fn with_base(base_url: Url) -> Self {
        Self {
            base_url: Some(base_url),
            ..Self::default()
        }
    }
}
