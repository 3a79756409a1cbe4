use thiserror::Error;

/// Failure of a single call against the remote gamification service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("fetch failed: {status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("not found")]
    NotFound,

    #[error("already exists")]
    Conflict,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    pub fn from_status(status: u16, status_text: impl Into<String>) -> Self {
        match status {
            404 => ApiError::NotFound,
            409 => ApiError::Conflict,
            _ => ApiError::Http {
                status,
                status_text: status_text.into(),
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
