use thiserror::Error;

/// エモートAPIエラー
#[derive(Debug, Error)]
pub enum EmoteError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout: API応答がありません")]
    Timeout,
}
