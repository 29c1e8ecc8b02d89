//! Bounded, newest-first message window persisted as a JSON array.
//!
//! [`MessageStore`] is the seam the rest of the crate depends on. The only
//! implementation, [`JsonFileStore`], rewrites the whole file on every
//! mutation. Its read-modify-write cycles are serialised through one async
//! mutex, and the file is replaced atomically, so a reader never observes a
//! partial write and concurrent likes or appends are not lost within one
//! process. Writers in other processes are not coordinated.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::message::Message;

/// Maximum number of records kept in the window.
pub const CAPACITY: usize = 10;

pub trait MessageStore: Send + Sync + 'static {
    /// At most [`CAPACITY`] records, newest first. Missing or malformed
    /// backing data reads as an empty window.
    fn read_all(&self) -> impl Future<Output = Vec<Message>> + Send;

    /// Insert `user` at the front and `bot` right behind it, evicting the
    /// oldest records beyond [`CAPACITY`].
    fn append_pair(
        &self,
        user: Message,
        bot: Message,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Add one like to the record with `id` and return its new count.
    fn increment_like(&self, id: &str) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Drop every stored record.
    fn reset(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Vec<Message> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "channel file absent; window is empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "channel file unreadable; window is empty");
                return Vec::new();
            }
        };
        match serde_json::from_slice::<Vec<Message>>(&bytes) {
            Ok(mut messages) => {
                messages.truncate(CAPACITY);
                messages
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "channel file corrupt; window is empty");
                Vec::new()
            }
        }
    }

    /// Persist `messages` (truncated to [`CAPACITY`]) via a sibling temp file
    /// and a rename.
    async fn save(&self, mut messages: Vec<Message>) -> Result<(), StoreError> {
        messages.truncate(CAPACITY);
        let json = serde_json::to_vec(&messages)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), records = messages.len(), "channel file written");
        Ok(())
    }
}

impl MessageStore for JsonFileStore {
    async fn read_all(&self) -> Vec<Message> {
        self.load().await
    }

    async fn append_pair(&self, user: Message, bot: Message) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut messages = self.load().await;
        messages.insert(0, user);
        messages.insert(1, bot);
        self.save(messages).await
    }

    async fn increment_like(&self, id: &str) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut messages = self.load().await;
        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))?;
        message.likes = message.likes.saturating_add(1);
        let likes = message.likes;
        self.save(messages).await?;
        Ok(likes)
    }

    async fn reset(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.save(Vec::new()).await
    }
}
