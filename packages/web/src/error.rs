use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong when talking to the browser.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WebError {
    /// A DOM call threw an exception
    #[error("javascript exception: {0}")]
    Js(String),

    /// There is no `window` or no `document`, so this is not a browser main thread
    #[error("no document is available")]
    NoDocument,

    /// No element has the configured root id
    #[error("no element with id `{0}` to mount into")]
    MissingRoot(String),

    /// A node that should be an element is something else
    #[error("expected an element, found a {0} node")]
    NotAnElement(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| js_sys::Reflect::get(&value, &"message".into()).ok()?.as_string())
            .unwrap_or_else(|| format!("{value:?}"));
        WebError::Js(message)
    }
}
