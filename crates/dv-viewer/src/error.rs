//! Error types for the viewer.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;

use crate::layout;

/// Viewer error type.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// No page matches the requested path.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Host and port do not form a socket address.
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    /// I/O error while serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ViewerError {
    fn into_response(self) -> Response {
        match &self {
            Self::PageNotFound(path) => {
                (StatusCode::NOT_FOUND, Html(layout::not_found(path))).into_response()
            }
            Self::InvalidAddress(_) | Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({"error": self.to_string()})),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_not_found_is_404() {
        let response = ViewerError::PageNotFound("en/cms/missing/".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_io_error_is_500() {
        let response = ViewerError::Io(std::io::Error::other("boom")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
