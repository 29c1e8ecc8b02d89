//! channel-core – the moderation and storage pipeline behind a hub chat channel.
//!
//! Components, leaf-first:
//! - [`filter::ProfanityFilter`] redacts flagged words from message text.
//! - [`responder::ResponseSelector`] picks a canned bot reply from a pool file.
//! - [`store::JsonFileStore`] keeps the bounded newest-first message window.
//! - [`pipeline::IngestionPipeline`] turns a posted message into a stored
//!   user/bot pair.
//! - [`query::QueryService`] serves the window back with optional ordering.
//!
//! Nothing in this crate reads the environment or knows about HTTP; the
//! server binary wires the pieces together from its configuration.

pub mod error;
pub mod filter;
pub mod message;
pub mod pipeline;
pub mod query;
pub mod responder;
pub mod store;

pub use error::StoreError;
pub use filter::ProfanityFilter;
pub use message::{IncomingMessage, Message};
pub use pipeline::IngestionPipeline;
pub use query::{QueryService, SortFilter};
pub use responder::{Pool, ResponseSelector};
pub use store::{JsonFileStore, MessageStore, CAPACITY};
