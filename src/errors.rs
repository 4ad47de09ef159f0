use axum::http::StatusCode;
use std::fmt;

/// Failures of the portal operations. None of them is fatal: every view
/// catches them and renders the message in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    Validation(String),
    NotFound(String),
    Auth,
    Storage(String),
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortalError::Validation(message) => f.write_str(message),
            PortalError::NotFound(id) => write!(f, "complaint id '{id}' not found"),
            PortalError::Auth => f.write_str("incorrect password"),
            PortalError::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl std::error::Error for PortalError {}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<PortalError> for AppError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::Validation(_) => Self::bad_request(err.to_string()),
            PortalError::NotFound(_) => Self::not_found(err.to_string()),
            PortalError::Auth => Self::unauthorized(err.to_string()),
            PortalError::Storage(_) => Self::internal(err),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
