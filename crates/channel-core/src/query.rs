//! Read side of the channel: ordering filters plus the welcome entry.

use std::sync::Arc;

use strum::{Display, EnumString};

use crate::message::{self, Message};
use crate::store::{CAPACITY, MessageStore};

pub const WELCOME_ID: &str = "000";
pub const WELCOME_SENDER: &str = "Welcome Message";

/// Ordering requested through the `filter` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortFilter {
    /// Reverse of the stored newest-first order.
    Oldest,
    /// Most likes first; equal counts keep their stored order.
    Popularity,
}

impl SortFilter {
    pub fn apply(self, messages: &mut [Message]) {
        match self {
            SortFilter::Oldest => messages.reverse(),
            SortFilter::Popularity => messages.sort_by(|a, b| b.likes.cmp(&a.likes)),
        }
    }
}

#[derive(Debug)]
pub struct QueryService<S> {
    store: Arc<S>,
    welcome_text: String,
}

impl<S: MessageStore> QueryService<S> {
    pub fn new(store: Arc<S>, welcome_text: impl Into<String>) -> Self {
        Self {
            store,
            welcome_text: welcome_text.into(),
        }
    }

    /// The stored window in the requested order, always preceded by a fresh
    /// welcome entry. At most `CAPACITY + 1` records.
    pub async fn list(&self, filter: Option<SortFilter>) -> Vec<Message> {
        let mut stored = self.store.read_all().await;
        if let Some(filter) = filter {
            filter.apply(&mut stored);
        }
        std::iter::once(self.welcome())
            .chain(stored)
            .take(CAPACITY + 1)
            .collect()
    }

    /// Synthetic first entry; never persisted.
    pub fn welcome(&self) -> Message {
        Message {
            id: WELCOME_ID.to_owned(),
            content: self.welcome_text.clone(),
            sender: WELCOME_SENDER.to_owned(),
            timestamp: message::now_iso(),
            category: None,
            movie: None,
            likes: 0,
            bot_response: String::new(),
        }
    }
}
