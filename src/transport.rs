//! HTTP GET of fragment markup.
//!
//! Uses the curl crate (libcurl) for the real transport. The trait is blocking
//! by design: the loader drives it through `spawn_blocking`, and unit tests
//! substitute an in-memory implementation.

use std::time::Duration;
use thiserror::Error;

use crate::config::LoaderConfig;

/// Transport-level failure fetching a fragment. Mapped into
/// `RetrievalErrorKind` by the loader, which adds the fragment path.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Status(u32),
    /// curl reported an error (timeout, connection, DNS, ...).
    #[error("{0}")]
    Network(String),
}

/// Blocking GET of a text body. Implementations run on a blocking thread and
/// must not assume a tokio runtime is reachable.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// libcurl-backed transport: one `Easy` handle per request.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    accept: String,
}

impl CurlTransport {
    pub fn from_config(cfg: &LoaderConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout,
            request_timeout: cfg.request_timeout,
            accept: cfg.accept.clone(),
        }
    }
}

fn curl_err(e: curl::Error) -> TransportError {
    TransportError::Network(e.to_string())
}

impl Transport for CurlTransport {
    fn get(&self, url: &str) -> Result<String, TransportError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(curl_err)?;
        easy.follow_location(true).map_err(curl_err)?;
        if let Some(t) = self.connect_timeout {
            easy.connect_timeout(t).map_err(curl_err)?;
        }
        if let Some(t) = self.request_timeout {
            easy.timeout(t).map_err(curl_err)?;
        }

        let mut list = curl::easy::List::new();
        list.append(&format!("Accept: {}", self.accept))
            .map_err(curl_err)?;
        easy.http_headers(list).map_err(curl_err)?;

        let mut body: Vec<u8> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_err)?;
            transfer.perform().map_err(curl_err)?;
        }

        let code = easy.response_code().map_err(curl_err)? as u32;
        if !(200..300).contains(&code) {
            return Err(TransportError::Status(code));
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
