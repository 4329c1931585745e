use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pinhole_core::ShortenerError;
use thiserror::Error;
use tracing::{error, warn};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing 'url' parameter")]
    MissingUrl,
    #[error("Not Found")]
    NotFound,
    #[error("Error creating short URL")]
    Shorten(#[source] ShortenerError),
    #[error("Error looking up short URL")]
    Lookup(#[source] ShortenerError),
    #[error("Stored URL cannot be used as a redirect target")]
    InvalidRedirectTarget(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingUrl => StatusCode::BAD_REQUEST,
            AppError::Shorten(ShortenerError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Shorten(_) | AppError::InvalidRedirectTarget(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Lookup(ShortenerError::Storage(e)) if e.is_transient() => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Shorten(source) | AppError::Lookup(source) if status.is_server_error() => {
                error!(error = %source, status = %status, "request failed");
            }
            AppError::InvalidRedirectTarget(code) => {
                warn!(code = %code, "stored url is not a valid Location header");
            }
            _ => {}
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinhole_core::StorageError;

    #[test]
    fn status_codes() {
        assert_eq!(AppError::MissingUrl.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Shorten(ShortenerError::InvalidUrl("empty".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Shorten(StorageError::Query("boom".into()).into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Lookup(StorageError::Timeout("slow".into()).into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn only_transient_lookup_failures_are_unavailable() {
        assert_eq!(
            AppError::Lookup(StorageError::Unavailable("down".into()).into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Lookup(StorageError::Query("syntax".into()).into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Lookup(StorageError::InvalidData("bad column".into()).into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_are_plain_text() {
        assert_eq!(AppError::MissingUrl.to_string(), "Missing 'url' parameter");
        assert_eq!(
            AppError::Shorten(StorageError::Query("boom".into()).into()).to_string(),
            "Error creating short URL"
        );
    }
}
