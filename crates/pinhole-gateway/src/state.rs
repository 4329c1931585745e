use std::sync::Arc;

use pinhole_core::Shortener;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    base_url: Option<String>,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, public_base_url: Option<String>) -> Self {
        Self {
            shortener,
            base_url: public_base_url,
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    /// Base URL for links handed back to clients.
    ///
    /// Falls back to `http://<host>` built from the request's `Host` header
    /// when no public base URL is configured.
    pub fn base_url(&self, host: Option<&str>) -> String {
        match &self.base_url {
            Some(base_url) => base_url.clone(),
            None => format!("http://{}", host.unwrap_or("localhost")),
        }
    }
}
