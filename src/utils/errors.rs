use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    HttpRequestError(#[from] reqwest::Error),

    #[error("HTTP {status} when fetching {url}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("Failed to parse RSS feed: {0}")]
    FeedParseError(#[from] rss::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("can not find environment variable {0}")]
    MissingEnvVar(String),

    #[error("empty passkey configured for {0}")]
    MissingPasskey(String),

    #[error("Invalid listen address: {0}")]
    InvalidListenAddr(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Callers only ever see a bare status code, details stay in the logs.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
