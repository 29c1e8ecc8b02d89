//! Message window endpoints: list, post, like and reset.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use channel_core::{IncomingMessage, Message, MessageStore, SortFilter};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};
use utoipa::{IntoParams, OpenApi};

use crate::error::ServerError;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_messages, post_message, like_message, reset_channel),
    components(schemas(Message, IncomingMessage))
)]
pub struct ChannelApi;

/// Routes that require the channel secret.
pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_messages).post(post_message))
        .route("/reset_channel", post(reset_channel))
}

/// Routes open to any caller.
pub fn public_router() -> Router<Arc<AppState>> {
    Router::new().route("/like_message/{id}", post(like_message))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// `oldest` or `popularity`; other values keep the newest-first order.
    pub filter: Option<String>,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "channel",
    params(ListParams),
    responses(
        (status = 200, description = "Welcome entry followed by the stored window", body = Vec<Message>),
        (status = 400, description = "Invalid authorization"),
    )
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Message>> {
    let filter = params
        .filter
        .as_deref()
        .and_then(|f| f.parse::<SortFilter>().ok());
    debug!(requested = ?params.filter, applied = ?filter, "listing messages");
    Json(state.query.list(filter).await)
}

#[utoipa::path(
    post,
    path = "/",
    tag = "channel",
    request_body = IncomingMessage,
    responses(
        (status = 200, description = "Message stored", body = String),
        (status = 400, description = "Invalid authorization or malformed message"),
        (status = 500, description = "Channel file could not be written"),
    )
)]
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IncomingMessage>, JsonRejection>,
) -> Result<&'static str, ServerError> {
    let Json(raw) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    state.pipeline.ingest(raw).await?;
    Ok("OK")
}

#[utoipa::path(
    post,
    path = "/like_message/{id}",
    tag = "channel",
    params(("id" = String, Path, description = "Message id")),
    responses(
        (status = 200, description = "Like recorded", body = Value),
        (status = 404, description = "Message ID not found", body = Value),
    )
)]
pub async fn like_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServerError> {
    let likes = state.store.increment_like(&id).await?;
    info!(%id, likes, "message liked");
    Ok(Json(json!({ "success": true, "likes": likes })))
}

#[utoipa::path(
    post,
    path = "/reset_channel",
    tag = "channel",
    responses(
        (status = 200, description = "Window emptied", body = Value),
        (status = 400, description = "Invalid authorization"),
    )
)]
pub async fn reset_channel(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ServerError> {
    state.store.reset().await?;
    info!("channel reset");
    Ok(Json(json!({ "success": true, "message": "Channel has been reset!" })))
}
