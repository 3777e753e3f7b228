use thiserror::Error;

#[derive(Debug, Error)]
pub enum CubeError {
    #[error("failed to bake face texture: {0}")]
    Bake(String),
    #[error("failed to decode logo: {0}")]
    LogoDecode(String),
    #[error("failed to fetch logo from {location}: {reason}")]
    LogoFetch { location: String, reason: String },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("gpu error: {0}")]
    Gpu(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
