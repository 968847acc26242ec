// src/error.rs
//! Failure kinds callers may want to tell apart. Everything else travels as
//! `anyhow::Error` with context attached at the call site.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Credentials or settings could not be loaded. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The notifier was handed an id the store does not know about.
    #[error("post {post_id} missing from store")]
    MissingRecord { post_id: String },

    #[error("no route configured for topic {topic}")]
    UnknownTopic { topic: String },

    #[error("feed error: {0}")]
    Feed(String),
}
