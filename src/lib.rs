// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod category;
pub mod collector;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod feed;
pub mod manifest;
pub mod notifier;
pub mod store;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::category::{classify, Category};
pub use crate::collector::Collector;
pub use crate::error::PipelineError;
pub use crate::manifest::{CategoryManifest, CollectorOutcome, NotifierInput};
pub use crate::notifier::{format_alert, Notifier, NotifierOptions, NotifyReport};
