use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Forecast period `{0}` collides with an existing chart label")]
    PeriodCollision(String),
    #[error("Invalid forecast request: {0}")]
    InvalidForecastRequest(String),
    #[error("Upstream feed unavailable: {0}")]
    Upstream(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}
