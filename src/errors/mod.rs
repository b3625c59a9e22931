use std::io;
use axum::{http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;

use crate::routing::Title;

/// Custom error types for the wiki application
#[derive(Debug, Error)]
pub enum WikiError {
    /// The request path is not `/{view|edit|save}/{title}`.
    #[error("404 page not found")]
    InvalidPath,
    /// No file backs this title yet.
    #[error("page {0} does not exist")]
    PageNotFound(Title),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("template error: {0}")]
    Template(String),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("expected an application/x-www-form-urlencoded body")]
    UnsupportedForm,
    #[error("configuration error: {0}")]
    Config(String),
}

impl WikiError {
    pub fn status(&self) -> StatusCode {
        match self {
            WikiError::InvalidPath | WikiError::PageNotFound(_) => StatusCode::NOT_FOUND,
            WikiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WikiError::UnsupportedForm => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            WikiError::Io(_) | WikiError::Template(_) | WikiError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let title = Title::parse("Missing").unwrap();
        assert_eq!(WikiError::InvalidPath.status(), StatusCode::NOT_FOUND);
        assert_eq!(WikiError::PageNotFound(title).status(), StatusCode::NOT_FOUND);
        assert_eq!(WikiError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(WikiError::UnsupportedForm.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            WikiError::Template("view".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn io_errors_keep_their_text() {
        let err = WikiError::from(io::Error::new(io::ErrorKind::PermissionDenied, "read-only pages dir"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "read-only pages dir");
    }
}
