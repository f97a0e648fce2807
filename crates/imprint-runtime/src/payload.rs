//! Page payload model and fetch seam.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

/// The slice of an emitted page payload the navigation machinery needs.
///
/// Payload JSON carries more fields (outline, prev/next, keywords); serde
/// ignores what the controller does not consume.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Payload {
    pub route: String,
    pub title: String,
    pub html: String,
    /// Build generation the payload belongs to. The client reloads when
    /// this stops matching the shell it booted from.
    pub generation: String,
}

/// Error produced by a [`PayloadFetcher`].
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("no payload for route `{0}`")]
    NotFound(String),
    #[error("payload fetch failed: {0}")]
    Transport(String),
    #[error("payload decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Retrieves page payloads by route.
///
/// Fetch failure is terminal for the navigation that requested it; the
/// controller never retries.
pub trait PayloadFetcher {
    fn fetch(&mut self, route: &str) -> Result<Payload, FetchError>;
}

/// Store-relative payload path for a route.
///
/// The root route maps to `payloads/index.json`, every other route to
/// `payloads/<route>.json`.
pub fn payload_path(route: &str) -> String {
    if route.is_empty() {
        "payloads/index.json".to_owned()
    } else {
        format!("payloads/{route}.json")
    }
}

/// Reads payloads from an emitted site directory.
///
/// Reference fetcher for tests and local tooling; the browser runtime does
/// the same resolution over HTTP.
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PayloadFetcher for DirFetcher {
    fn fetch(&mut self, route: &str) -> Result<Payload, FetchError> {
        let path = self.root.join(payload_path(route));
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::NotFound(route.to_owned()));
            }
            Err(err) => return Err(FetchError::Transport(err.to_string())),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }
}
