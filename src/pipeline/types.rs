//! Shared types for the ingestion pipeline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

// ── Candidate item ──────────────────────────────────────────────────

/// A candidate post fetched from a content source.
///
/// Source connectors convert their native listing format into this
/// struct. Immutable once fetched — the pipeline never writes back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateItem {
    /// Stable identifier, unique within the source.
    pub id: String,
    /// Source name this item was fetched from.
    pub source: String,
    /// Post title, in the source language.
    pub title: String,
    /// Post body text, in the source language. May be empty.
    pub body: String,
    /// Absolute link back to the original post.
    pub permalink: String,
}

// ── Enriched item ───────────────────────────────────────────────────

/// A relevant item after enrichment, awaiting a moderation decision.
///
/// Created only for items that pass the keyword filter. Owned by the
/// approval queue from creation until it is approved or rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrichedItem {
    /// Source item ID — also the approval queue key.
    pub id: String,
    /// Translated title.
    pub title: String,
    /// Translated body excerpt (truncated before translation).
    pub excerpt: String,
    /// Predicted category label, e.g. "#Tech".
    pub category: String,
    /// Link back to the original post.
    pub source_url: String,
    /// Source name the item came from.
    pub source: String,
    /// When the item entered the approval queue.
    pub enqueued_at: DateTime<Utc>,
}

// ── Source connector trait ──────────────────────────────────────────

/// Trait for content source connectors — pure I/O, no pipeline logic.
///
/// Dedup, filtering, enrichment and queueing live in `IngestProcessor`.
#[async_trait]
pub trait SourceConnector: Send + Sync {
    /// Connector name (e.g. "reddit").
    fn name(&self) -> &str;

    /// Fetch up to `limit` of the newest items from the named source.
    async fn list_new(&self, source: &str, limit: usize)
    -> Result<Vec<CandidateItem>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_item_roundtrips_through_json() {
        let item = CandidateItem {
            id: "abc123".into(),
            source: "forhire".into(),
            title: "[Hiring] logo designer".into(),
            body: "Need a simple logo".into(),
            permalink: "https://reddit.com/r/forhire/comments/abc123".into(),
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: CandidateItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
