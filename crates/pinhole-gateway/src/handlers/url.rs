use crate::error::{AppError, Result};
use crate::handlers::form::UrlField;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use pinhole_core::ShortCode;
use tracing::debug;

/// `POST /shorten`: stores the `url` form field and returns the short link.
///
/// Any non-empty value is accepted.
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    UrlField(long_url): UrlField,
) -> Result<String> {
    let long_url = long_url.ok_or(AppError::MissingUrl)?;

    let code = state
        .shortener()
        .shorten(&long_url)
        .await
        .map_err(AppError::Shorten)?;

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok());
    let short_url = code.to_url(&state.base_url(host));

    Ok(format!("Shortened URL: {short_url}"))
}

/// `GET /{code}`: redirects to the stored long URL with 302 Found.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response> {
    // A code that fails validation was never issued.
    let Ok(code) = ShortCode::new(code) else {
        return Err(AppError::NotFound);
    };

    let long_url = state
        .shortener()
        .resolve(&code)
        .await
        .map_err(AppError::Lookup)?
        .ok_or(AppError::NotFound)?;

    let location = HeaderValue::try_from(long_url)
        .map_err(|_| AppError::InvalidRedirectTarget(code.to_string()))?;

    debug!(code = %code, "redirecting");
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
