//! Content source connectors.

pub mod reddit;

pub use reddit::RedditSource;
