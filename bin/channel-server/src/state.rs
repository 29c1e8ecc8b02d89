//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use channel_core::{
    IngestionPipeline, JsonFileStore, ProfanityFilter, QueryService, ResponseSelector,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Config;

/// State shared across all HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Bounded message window on disk.
    pub store: Arc<JsonFileStore>,
    /// Write side: moderation, bot reply, persistence.
    pub pipeline: IngestionPipeline<JsonFileStore>,
    /// Read side: ordering and welcome entry.
    pub query: QueryService<JsonFileStore>,
}

impl AppState {
    /// Wire the channel components from `config` with an OS-seeded RNG.
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Like [`AppState::new`] but with a caller-provided random source.
    pub fn with_rng(config: Config, rng: StdRng) -> Self {
        let filter = Arc::new(ProfanityFilter::load(config.censor_words_file.as_deref()));
        let selector = ResponseSelector::new(
            config.responses_file.clone(),
            config.profanity_responses_file.clone(),
        );
        let store = Arc::new(JsonFileStore::new(config.channel_file.clone()));
        let pipeline = IngestionPipeline::new(filter, selector, Arc::clone(&store), rng);
        let query = QueryService::new(Arc::clone(&store), config.welcome_text.clone());

        Self {
            config: Arc::new(config),
            store,
            pipeline,
            query,
        }
    }
}
