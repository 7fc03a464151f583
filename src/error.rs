use crate::config::ConfigError;
use thiserror::Error;

/// Every failure of a run. All of them end the probe with UNKNOWN.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0}")]
    BadArguments(String),
    #[error("Unable to resolve hostname {host}: {source}")]
    NameResolution {
        host: String,
        source: std::io::Error,
    },
    #[error("unable to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{method} request to {host} failed: {source}")]
    Transport {
        host: String,
        method: &'static str,
        source: reqwest::Error,
    },
    #[error("Invalid response received: {method} on {host} returned HTTP {status}")]
    HttpStatus {
        host: String,
        method: &'static str,
        status: u16,
    },
    #[error("{method} on {host} returned an API error: {message}")]
    Api {
        host: String,
        method: &'static str,
        message: String,
    },
    #[error("unexpected {method} response from {host}: {detail}")]
    MalformedResponse {
        host: String,
        method: &'static str,
        detail: String,
    },
    #[error("Unable to open & write to {path}, check perms or disable checks.disk_activity: {source}")]
    Filesystem {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
