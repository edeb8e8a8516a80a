use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};

use crate::auth::AuthDecision;
use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::parser;

pub async fn submit(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .map(|v| v.as_bytes())
        .unwrap_or_default();

    let decision = state.gate.authorize(authorization);
    if let AuthDecision::Rejected(rejection) = decision {
        tracing::info!("Rejected submission to {}: {rejection:?}", uri.path());
        return Err(rejection.into());
    }

    let payload = parser::request_field(&method, &headers, uri.query(), body)
        .await
        .map_err(AppError::PayloadInvalid)?;

    state.processor.handle(decision, payload.as_bytes()).await?;

    Ok(StatusCode::OK)
}
