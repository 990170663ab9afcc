//! Error Types

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// The request never produced a response (offline, CORS, aborted)
    #[error("network error: {0}")]
    Network(String),
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },
    /// Body was not JSON, or not a list / `{results}` envelope
    #[error("malformed payload: {0}")]
    Decode(String),
    #[error("dom error: {0}")]
    Dom(String),
    #[error("invalid config: {0}")]
    Config(String),
}

impl FilterError {
    /// Failures where the server may still answer a different URL
    pub fn is_transport(&self) -> bool {
        matches!(self, FilterError::Network(_) | FilterError::Status { .. })
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::Decode(err.to_string())
    }
}

impl From<gloo_net::Error> for FilterError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => FilterError::Decode(e.to_string()),
            other => FilterError::Network(other.to_string()),
        }
    }
}

impl From<FilterError> for wasm_bindgen::JsValue {
    fn from(err: FilterError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
