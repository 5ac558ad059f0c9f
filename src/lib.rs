pub mod config;
pub mod dom;
pub mod error;
pub mod loader;
pub mod logging;
pub mod options;
pub mod prefetch;
pub mod scripts;
pub mod transport;
