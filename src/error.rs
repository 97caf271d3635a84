use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;
use thiserror::Error;

/// Failure of a single outbound call to one inference backend. Recovered
/// locally by the invoker via the fallback attempt; only surfaced to the
/// caller wrapped in an [`InferenceFailure`] when every backend has failed.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

/// One failed backend attempt, kept for diagnostics.
#[derive(Debug)]
pub struct FailedAttempt {
    pub model: String,
    pub error: ServiceError,
}

/// Terminal failure: every configured backend rejected the request.
#[derive(Debug)]
pub struct InferenceFailure {
    pub attempts: Vec<FailedAttempt>,
}

impl fmt::Display for InferenceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all inference backends failed")?;
        for attempt in &self.attempts {
            write!(f, "; {}: {}", attempt.model, attempt.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for InferenceFailure {}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid image payload: {0}")]
    Validation(String),

    #[error("Analysis failed: {0}")]
    Inference(#[from] InferenceFailure),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Url(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Inference(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
