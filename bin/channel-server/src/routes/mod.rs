//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - `/health`, `GET /`, `POST /` and `/reset_channel` behind the
//!   shared-secret check
//! - `/like_message/{id}`, open to any caller
//! - `/api-docs/openapi.json`

mod channel;
pub mod doc;
mod health;

use axum::routing::get;
use axum::{Router, middleware};
use std::sync::Arc;

use crate::middleware::{auth, cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .merge(health::router())
        .merge(channel::protected_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .merge(protected)
        .merge(channel::public_router())
        .route("/api-docs/openapi.json", get(doc::openapi_json))
        // Outermost layers execute first on the way in.
        .layer(cors::cors_layer(&state))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
