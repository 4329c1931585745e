use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{landing_handler, method_not_allowed, redirect_handler, shorten_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Builds the route table.
    ///
    /// `/shorten` is matched before `/{code}`, so `GET /shorten` is answered
    /// with 405 rather than treated as a lookup of the code `shorten`.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(landing_handler).fallback(method_not_allowed))
            .route(
                "/shorten",
                post(shorten_handler).fallback(method_not_allowed),
            )
            .route(
                "/{code}",
                get(redirect_handler).fallback(method_not_allowed),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
