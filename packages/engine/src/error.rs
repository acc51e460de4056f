use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum RippleError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Malformed config json: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("Pixel buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Canvas unavailable: {0}")]
    Canvas(String),
}

impl From<RippleError> for JsValue {
    fn from(err: RippleError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RippleError>;
