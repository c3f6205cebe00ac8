use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("critical asset `{name}` is unavailable")]
    AssetUnavailable { name: String },

    #[error("failed to load asset `{name}`: {reason}")]
    AssetLoad { name: String, reason: String },

    #[error("asset loading was cancelled")]
    LoadCancelled,

    #[error("render backend failure: {0}")]
    Backend(String),
}
