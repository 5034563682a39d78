// Public modules
pub mod config;
pub mod console;
pub mod filters;
pub mod integrations;
pub mod models;
pub mod reddit;
pub mod spotify;
pub mod twitter;

mod http;

// Re-export commonly used types
pub use config::Config;
pub use filters::{EntityFilter, TimeWindow};
pub use integrations::{select_integrations, Integration};
pub use models::{Post, PostKind, Track, Tweet, TweetBatch, TweetKind};
pub use reddit::RedditOptions;
pub use spotify::SpotifyOptions;
pub use twitter::TwitterOptions;
