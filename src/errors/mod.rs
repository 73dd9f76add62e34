use std::{fmt, io};
use axum::{http::StatusCode, response::{IntoResponse, Response}};

/// Custom error types for the wiki application
#[derive(Debug)]
pub enum WikiError {
    Io(io::Error),
    NotFound,
    InvalidPath,
    OutsideRepo,
    Vcs(String),
    TemplateError(String),
    Internal(String),
}

impl From<io::Error> for WikiError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            return WikiError::NotFound;
        }
        WikiError::Io(err)
    }
}

impl fmt::Display for WikiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WikiError::Io(e) => write!(f, "I/O error: {}", e),
            WikiError::NotFound => write!(f, "not found"),
            WikiError::InvalidPath => write!(f, "invalid path"),
            WikiError::OutsideRepo => write!(f, "path outside of repo"),
            WikiError::Vcs(e) => write!(f, "version control error: {}", e),
            WikiError::TemplateError(e) => write!(f, "template error: {}", e),
            WikiError::Internal(e) => write!(f, "internal error: {}", e),
        }
    }
}

impl std::error::Error for WikiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WikiError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl WikiError {
    /// HTTP status reported for this error
    pub fn status(&self) -> StatusCode {
        match self {
            WikiError::NotFound => StatusCode::NOT_FOUND,
            WikiError::InvalidPath | WikiError::OutsideRepo => StatusCode::BAD_REQUEST,
            WikiError::Io(_)
            | WikiError::Vcs(_)
            | WikiError::TemplateError(_)
            | WikiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::warn!("Request rejected: {}", self);
        }
        match self {
            WikiError::NotFound => (status, "Not found").into_response(),
            WikiError::InvalidPath => (status, "Invalid path").into_response(),
            WikiError::OutsideRepo => (status, "Path outside of repo").into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}
