use axum::http::StatusCode;

pub const LANDING_TEXT: &str = "pinhole: POST a `url` form field to /shorten";

/// Placeholder page served on `/`.
pub async fn landing_handler() -> &'static str {
    LANDING_TEXT
}

/// Shared fallback for routes hit with an unsupported method.
pub async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}
