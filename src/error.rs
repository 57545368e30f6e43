/// Error types for lookups and browser host calls
use thiserror::Error;

/// A failed search request. Never used for "no articles found".
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LookupError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0} ms")]
    Timeout(u32),

    #[error("search endpoint returned HTTP {0}")]
    Status(u16),

    #[error("search response is not valid JSON: {0}")]
    InvalidJson(String),
}

/// A browser extension API call that failed or returned something unexpected
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HostError {
    #[error("extension API call failed: {0}")]
    Api(String),

    #[error("could not convert extension data: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HostError {
    fn from(e: serde_json::Error) -> Self {
        HostError::Serialization(e.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for HostError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        HostError::Serialization(e.to_string())
    }
}
