pub mod submit;

use axum::routing::any;
use axum::Router;

use crate::state::SharedState;

/// The submission handler sits at the root and catches every unrouted path.
pub fn submission_routes() -> Router<SharedState> {
    Router::new()
        .route("/", any(submit::submit))
        .fallback(submit::submit)
}
