pub mod config;
pub mod error;
pub mod state;
pub mod auth;
pub mod db;
pub mod models;
pub mod routes;
pub mod email;
pub mod submission;
pub mod worker;

use std::sync::Arc;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::auth::AuthGate;
use crate::config::Config;
use crate::db::RecordStore;
use crate::state::{AppState, SharedState};
use crate::submission::SubmissionProcessor;
use crate::worker::NotificationDispatcher;

pub fn build_app(
    config: Config,
    store: Arc<dyn RecordStore>,
    dispatcher: NotificationDispatcher,
) -> Router {
    let gate = AuthGate::new(&config.allowed_tokens);
    if gate.is_open() {
        tracing::warn!("ATTENDANCE_ALLOWED_TOKENS is empty!");
        tracing::warn!("  --- accepting submissions from anyone");
    }

    let processor = SubmissionProcessor::new(store, dispatcher, config.mail);
    let state: SharedState = Arc::new(AppState { gate, processor });

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::HEAD])
        .allow_headers([header::AUTHORIZATION])
        .expose_headers([header::AUTHORIZATION]);

    Router::new()
        .route("/health", axum::routing::get(health))
        .merge(routes::submission_routes())
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
