use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Engine(#[from] engine::EngineError),
    #[error("invalid base_url: {0}")]
    InvalidUrl(String),
}

impl From<engine::ValidationError> for AppError {
    fn from(err: engine::ValidationError) -> Self {
        Self::Engine(err.into())
    }
}
