//! Error types for comentaram-feed.

use thiserror::Error;

/// Result type for feed operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two topics share an id
    #[error("duplicate topic id: {0}")]
    DuplicateTopic(String),

    /// Two categories share an id
    #[error("duplicate category id: {0}")]
    DuplicateCategory(String),

    /// A topic or category was declared with an empty id
    #[error("empty {0} id")]
    EmptyId(&'static str),

    /// Lookup for a topic that is not in the catalog
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
}
