//! Structured error types for vtable.
//!
//! Layout passes never fail: bad row data degrades to a fallback layout and is
//! reported through `tracing`. Errors are reserved for configuration input
//! and the CLI's file handling.

/// All errors that can occur while configuring or driving a table.
#[derive(Debug, thiserror::Error)]
pub enum VtableError {
    /// A scroll request mixed addressing modes or had none.
    #[error("Invalid scroll config: {0}")]
    InvalidScrollConfig(String),

    /// Table configuration rejected.
    #[error("Invalid table config: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a table description.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VtableError>;

#[cfg(target_arch = "wasm32")]
impl From<VtableError> for wasm_bindgen::JsValue {
    fn from(e: VtableError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
