// src/config/mod.rs
pub mod credentials;
pub mod settings;

pub use credentials::RedditCredentials;
pub use settings::Settings;
