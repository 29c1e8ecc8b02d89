//! Posted message → moderated user record + bot reply → stored pair.

use std::sync::{Arc, Mutex, PoisonError};

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::filter::ProfanityFilter;
use crate::message::{self, IncomingMessage, Message};
use crate::responder::{Pool, ResponseSelector};
use crate::store::MessageStore;

pub const DEFAULT_CATEGORY: &str = "Other";
pub const DEFAULT_MOVIE: &str = "Unknown";

pub struct IngestionPipeline<S, R = StdRng> {
    filter: Arc<ProfanityFilter>,
    selector: ResponseSelector,
    store: Arc<S>,
    rng: Mutex<R>,
}

impl<S, R> std::fmt::Debug for IngestionPipeline<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline")
            .field("censor_words", &self.filter.len())
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

impl<S: MessageStore, R: Rng + Send> IngestionPipeline<S, R> {
    /// `rng` drives pseudonym and reply selection; pass a seeded generator
    /// for reproducible output.
    pub fn new(
        filter: Arc<ProfanityFilter>,
        selector: ResponseSelector,
        store: Arc<S>,
        rng: R,
    ) -> Self {
        Self {
            filter,
            selector,
            store,
            rng: Mutex::new(rng),
        }
    }

    /// Moderate `raw`, pair it with a bot reply and store both.
    ///
    /// Returns the stored `(user, bot)` records.
    pub async fn ingest(&self, raw: IncomingMessage) -> Result<(Message, Message), StoreError> {
        let sender = self.sender_name(raw.sender.as_deref());
        let timestamp = message::display_timestamp(raw.timestamp.as_deref());

        let content = self.filter.censor(&raw.content);
        // Any change made by the filter counts as profanity.
        let pool = if content != raw.content {
            Pool::Profanity
        } else {
            Pool::Normal
        };
        let reply = self.selector.pick(pool, &self.rng).await;

        let user = Message {
            id: Uuid::new_v4().to_string(),
            content,
            sender,
            timestamp,
            category: Some(raw.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_owned())),
            movie: Some(raw.movie.unwrap_or_else(|| DEFAULT_MOVIE.to_owned())),
            likes: raw.likes.unwrap_or(0),
            bot_response: reply.clone(),
        };
        let bot = Message::bot_reply(Uuid::new_v4().to_string(), reply, message::now_display());

        debug!(user_id = %user.id, bot_id = %bot.id, %pool, "storing message pair");
        self.store.append_pair(user.clone(), bot.clone()).await?;
        info!(id = %user.id, sender = %user.sender, moderated = (pool == Pool::Profanity), "message ingested");
        Ok((user, bot))
    }

    /// Trimmed caller-supplied name, or `Anonymous<n>` / `User<n>` with
    /// `n` in `1..=999` when blank.
    fn sender_name(&self, raw: Option<&str>) -> String {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => name.to_owned(),
            None => {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                let prefix = if rng.random_bool(0.5) { "Anonymous" } else { "User" };
                format!("{prefix}{}", rng.random_range(1..=999))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::{CAPACITY, JsonFileStore};
    use rand::SeedableRng;

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Arc<JsonFileStore>,
        pipeline: IngestionPipeline<JsonFileStore>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let normal = dir.path().join("responses.txt");
        let profanity = dir.path().join("profanity_responses.txt");
        std::fs::write(&normal, "nice one\ntell me more\n").unwrap();
        std::fs::write(&profanity, "language!\n").unwrap();

        let store = Arc::new(JsonFileStore::new(dir.path().join("messages.json")));
        let pipeline = IngestionPipeline::new(
            Arc::new(ProfanityFilter::from_word_list("damn\n")),
            ResponseSelector::new(normal, profanity),
            Arc::clone(&store),
            StdRng::seed_from_u64(1),
        );
        Fixture {
            _dir: dir,
            store,
            pipeline,
        }
    }

    #[tokio::test]
    async fn clean_message_gets_normal_reply() {
        let fx = fixture();
        let (user, bot) = fx.pipeline.ingest(IncomingMessage::new("hello")).await.unwrap();

        assert_eq!(user.content, "hello");
        assert!(["nice one", "tell me more"].contains(&user.bot_response.as_str()));
        assert_eq!(bot.content, user.bot_response);
        assert_eq!(bot.sender, "BOT");
        assert_eq!(bot.bot_response, "");
        assert_eq!(bot.category, None);
        assert_ne!(user.id, bot.id);
    }

    #[tokio::test]
    async fn profane_message_is_redacted_and_gets_profanity_reply() {
        let fx = fixture();
        let (user, bot) = fx
            .pipeline
            .ingest(IncomingMessage::new("damn that twist"))
            .await
            .unwrap();
        assert_eq!(user.content, "**** that twist");
        assert_eq!(user.bot_response, "language!");
        assert_eq!(bot.content, "language!");
    }

    #[tokio::test]
    async fn defaults_are_applied() {
        let fx = fixture();
        let (user, _) = fx.pipeline.ingest(IncomingMessage::new("hi")).await.unwrap();
        assert_eq!(user.category.as_deref(), Some("Other"));
        assert_eq!(user.movie.as_deref(), Some("Unknown"));
        assert_eq!(user.likes, 0);
    }

    #[tokio::test]
    async fn caller_fields_are_kept() {
        let fx = fixture();
        let raw = IncomingMessage {
            content: "Great movie!".into(),
            sender: Some("  alice  ".into()),
            timestamp: Some("2024-01-01T10:00:00".into()),
            category: Some("Sci-Fi".into()),
            movie: Some("Dune".into()),
            likes: Some(5),
        };
        let (user, _) = fx.pipeline.ingest(raw).await.unwrap();
        assert_eq!(user.sender, "alice");
        assert_eq!(user.timestamp, "01 Jan 10:00");
        assert_eq!(user.category.as_deref(), Some("Sci-Fi"));
        assert_eq!(user.movie.as_deref(), Some("Dune"));
        assert_eq!(user.likes, 5);
    }

    #[tokio::test]
    async fn blank_sender_gets_pseudonym() {
        let fx = fixture();
        for sender in [None, Some("   ".to_owned()), Some(String::new())] {
            let raw = IncomingMessage {
                sender,
                ..IncomingMessage::new("hi")
            };
            let (user, _) = fx.pipeline.ingest(raw).await.unwrap();
            let suffix = user
                .sender
                .strip_prefix("Anonymous")
                .or_else(|| user.sender.strip_prefix("User"))
                .unwrap_or_else(|| panic!("unexpected pseudonym {}", user.sender));
            let n: u32 = suffix.parse().unwrap();
            assert!((1..=999).contains(&n));
        }
    }

    #[tokio::test]
    async fn pair_is_stored_user_first() {
        let fx = fixture();
        let (user, bot) = fx.pipeline.ingest(IncomingMessage::new("one")).await.unwrap();
        let stored = fx.store.read_all().await;
        assert_eq!(stored, vec![user, bot]);
    }

    #[tokio::test]
    async fn repeated_ingest_keeps_capacity() {
        let fx = fixture();
        for n in 1..=7 {
            fx.pipeline
                .ingest(IncomingMessage::new(format!("msg {n}")))
                .await
                .unwrap();
            assert_eq!(fx.store.read_all().await.len(), (n * 2).min(CAPACITY));
        }
        let stored = fx.store.read_all().await;
        assert_eq!(stored[0].content, "msg 7");
        assert_eq!(stored[CAPACITY - 2].content, "msg 3");
    }
}
