//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Bot configuration.
///
/// Everything the pipeline treats as a constant: the operator identity,
/// the destination channel, which sources to poll and how often, the
/// relevance keywords, and the translation language pair.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Identity of the single operator allowed to approve/reject.
    pub admin_user: String,
    /// Destination channel approved items are published to.
    pub feed_channel: String,
    /// Source names polled each tick, in declared order.
    pub sources: Vec<String>,
    /// Keyword phrases a title must contain (case-insensitive) to be kept.
    pub keywords: Vec<String>,
    /// Interval between ingest ticks.
    pub poll_interval: Duration,
    /// Maximum number of newest items fetched per source per tick.
    pub fetch_limit: usize,
    /// Body excerpt length in characters (taken before translation).
    pub excerpt_chars: usize,
    /// Language the sources are written in.
    pub source_lang: String,
    /// Language the feed is curated for.
    pub dest_lang: String,
    /// Optional bound on the seen-set. `None` keeps every evaluated ID
    /// for the lifetime of the process.
    pub seen_capacity: Option<usize>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            admin_user: String::new(),
            feed_channel: String::new(),
            sources: vec![
                "slavelabour".to_string(),
                "forhire".to_string(),
                "Jobs4Bitcoins".to_string(),
                "taskrabbit".to_string(),
            ],
            keywords: vec![
                "task".to_string(),
                "micro job".to_string(),
                "hiring".to_string(),
                "help needed".to_string(),
                "small job".to_string(),
            ],
            poll_interval: Duration::from_secs(600), // 10 minutes
            fetch_limit: 10,
            excerpt_chars: 500,
            source_lang: "en".to_string(),
            dest_lang: "vi".to_string(),
            seen_capacity: None,
        }
    }
}

impl BotConfig {
    /// Load configuration from the environment.
    ///
    /// `JOBSCOUT_ADMIN_USER` and `JOBSCOUT_FEED_CHANNEL` are required;
    /// everything else falls back to the defaults above.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            admin_user: require_env("JOBSCOUT_ADMIN_USER")?,
            feed_channel: require_env("JOBSCOUT_FEED_CHANNEL")?,
            ..Self::default()
        };

        if let Some(sources) = list_env("JOBSCOUT_SOURCES") {
            config.sources = sources;
        }
        if let Some(keywords) = list_env("JOBSCOUT_KEYWORDS") {
            config.keywords = keywords;
        }
        if let Some(secs) = parse_env::<u64>("JOBSCOUT_POLL_INTERVAL_SECS")? {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(limit) = parse_env::<usize>("JOBSCOUT_FETCH_LIMIT")? {
            config.fetch_limit = limit;
        }
        if let Some(chars) = parse_env::<usize>("JOBSCOUT_EXCERPT_CHARS")? {
            config.excerpt_chars = chars;
        }
        if let Ok(lang) = std::env::var("JOBSCOUT_SOURCE_LANG") {
            config.source_lang = lang;
        }
        if let Ok(lang) = std::env::var("JOBSCOUT_DEST_LANG") {
            config.dest_lang = lang;
        }
        config.seen_capacity = parse_env::<usize>("JOBSCOUT_SEEN_CAPACITY")?;

        Ok(config)
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Comma-separated list variable; empty entries are dropped.
fn list_env(key: &str) -> Option<Vec<String>> {
    let raw = std::env::var(key).ok()?;
    let items: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    (!items.is_empty()).then_some(items)
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("could not parse {raw:?}"),
            }),
        Err(_) => Ok(None),
    }
}
