//! Error types for JobScout.

/// Top-level error type for the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Translation error: {0}")]
    Translate(#[from] TranslateError),

    #[error("Classifier error: {0}")]
    Classify(#[from] ClassifyError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Content source errors. A failed source is logged and skipped; the
/// remaining sources still run within the same tick.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Fetch from source {source_name} failed: {reason}")]
    Fetch { source_name: String, reason: String },

    #[error("Could not decode listing from source {source_name}: {reason}")]
    Decode { source_name: String, reason: String },
}

/// Messaging channel errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Failed to send message on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("Invalid message format: {0}")]
    InvalidMessage(String),
}

/// Translation service errors. These never escape the translation
/// adapter — it falls back to the original text.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Translation request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Invalid response from translation service: {reason}")]
    InvalidResponse { reason: String },
}

/// Category classifier errors.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Classifier model is unavailable")]
    ModelUnavailable,
}

/// Moderation command errors. Each variant maps to a distinct
/// acknowledgment back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("You are not allowed to perform this action")]
    Unauthorized,

    #[error("Item {id} does not exist or has already been decided")]
    NotFound { id: String },

    #[error("Publishing failed, item kept pending: {0}")]
    Publish(#[from] ChannelError),
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
