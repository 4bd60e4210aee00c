//! Error types for the landing page runtime.
//!
//! Feature code never surfaces errors: a missing element only means a missing
//! effect. These errors exist for startup, where the host itself may be
//! unusable.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Result type for startup operations.
pub type Result<T> = std::result::Result<T, LandingError>;

#[derive(Debug, Error)]
pub enum LandingError {
    /// The inline configuration block could not be parsed.
    #[error("invalid landing config: {0}")]
    Config(#[from] serde_json::Error),

    /// A browser global (window, document, body, head) is not available.
    #[error("missing browser global: {0}")]
    MissingGlobal(&'static str),

    /// A call into the host threw.
    #[error("javascript error: {0}")]
    Js(String),

    /// A stylesheet could not be parsed or mounted.
    #[error("stylesheet error: {0}")]
    Style(String),
}

impl From<JsValue> for LandingError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        LandingError::Js(message)
    }
}

impl From<stylist::Error> for LandingError {
    fn from(err: stylist::Error) -> Self {
        LandingError::Style(err.to_string())
    }
}
