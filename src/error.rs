use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("element #{0} not found")]
    ElementNotFound(String),
    #[error("element #{id} is not a {expected}")]
    WrongElementType { id: String, expected: &'static str },
    #[error("WebGL2 not supported")]
    WebGl2Unsupported,
    #[error("shader compile failed: {0}")]
    ShaderCompile(String),
    #[error("program link failed: {0}")]
    ProgramLink(String),
    #[error("unable to create {0}")]
    Allocation(&'static str),
    #[error("attribute {0} not found in program")]
    MissingAttribute(&'static str),
    #[error("uniform {0} not found in program")]
    MissingUniform(&'static str),
    #[error("misaligned mesh: {positions} positions vs {colors} colors")]
    MisalignedMesh { positions: usize, colors: usize },
    #[error("unknown setting {0:?}")]
    UnknownSetting(String),
    #[error("invalid value {value:?} for setting {key}")]
    InvalidSetting { key: String, value: String },
    #[error("javascript error: {0}")]
    Js(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
