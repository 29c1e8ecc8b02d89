//! OpenAPI document for the channel routes.

use axum::Json;
use utoipa::OpenApi;

use super::{channel, health};

#[derive(OpenApi)]
#[openapi(info(title = "channel-server", description = "Hub chat channel API"))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(health::HealthApi::openapi());
    doc.merge(channel::ChannelApi::openapi());
    doc
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(get_docs())
}
