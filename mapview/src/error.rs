//! Error type shared by the engine and its host.

use wasm_bindgen::JsValue;

use crate::filter::FilterError;

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Input rejected before any request was issued.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Request rejected or answered with a non-2xx status.
    #[error("network error: {0}")]
    Network(String),
    /// Save endpoint answered `success: false`; local edits are kept.
    #[error("save rejected: {0}")]
    PersistenceConflict(String),
    /// A browser drawing call failed.
    #[error("render failed: {0}")]
    Render(String),
}

impl ViewerError {
    /// Stable code for status messages and logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Network(_) => "E_NETWORK",
            Self::PersistenceConflict(_) => "E_PERSISTENCE_CONFLICT",
            Self::Render(_) => "E_RENDER",
        }
    }

    /// Build a render error from a browser exception value.
    #[must_use]
    pub fn from_js(value: &JsValue) -> Self {
        let message = value.as_string().unwrap_or_else(|| format!("{value:?}"));
        Self::Render(message)
    }
}

impl From<FilterError> for ViewerError {
    fn from(err: FilterError) -> Self {
        Self::Validation(err.to_string())
    }
}
