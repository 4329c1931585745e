use crate::error::{CoreError, Result};
use std::fmt::Display;

/// A short code identifying a stored URL mapping.
///
/// Generated codes are URL-safe base64 text, so a valid code contains only
/// `[a-zA-Z0-9_-]` plus trailing `=` padding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShortCode(String);

const MAX_LENGTH: usize = 64;

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    ///
    /// Used for codes arriving from the outside world (e.g. a request path).
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (e.g. the counter generator or rows read back from storage).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<()> {
        if code.is_empty() || code.len() > MAX_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between 1 and {}, got {}",
                MAX_LENGTH,
                code.len()
            )));
        }

        let body = code.trim_end_matches('=');
        if body.is_empty()
            || !body
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CoreError::InvalidShortCode(format!(
                "must be url-safe base64 text: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
