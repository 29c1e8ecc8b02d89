use crate::state::AppState;
use tower_http::cors::{Any, CorsLayer};

pub fn cors_layer(state: &AppState) -> CorsLayer {
    let base = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    let Some(origins_str) = &state.config.cors_allowed_origins else {
        // Wildcard; set CHANNEL_CORS_ORIGINS to restrict.
        return base.allow_origin(Any);
    };
    let origins: Vec<axum::http::HeaderValue> = origins_str
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(origins)
    }
}

