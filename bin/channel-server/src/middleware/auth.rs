use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::error::ServerError;
use crate::state::AppState;

/// Reject requests whose `Authorization` header is not exactly
/// `authkey <channel secret>`.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ServerError> {
    let expected = state.config.expected_authorization();
    let provided = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let header_present = provided.is_some();

    if provided == Some(expected.as_str()) {
        return Ok(next.run(req).await);
    }
    warn!(
        path = %req.uri().path(),
        header_present,
        "rejected request with invalid authorization"
    );
    Err(ServerError::Unauthorized)
}
