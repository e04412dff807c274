//! Field Errors

use thiserror::Error;

/// Errors surfaced to the host. Only construction returns them; everything
/// else degrades to a no-op.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("passed selector does not point to a DOM element: {0}")]
    SelectorNotFound(String),

    #[error("element matched by {0} is not an HTML element")]
    NotAnHtmlElement(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("javascript error: {0}")]
    Js(String),

    #[error("malformed suggestions response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl From<wasm_bindgen::JsValue> for FieldError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        FieldError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<FieldError> for wasm_bindgen::JsValue {
    fn from(err: FieldError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

pub type Result<T> = std::result::Result<T, FieldError>;
