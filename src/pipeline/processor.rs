//! Ingestion processor — drives the per-tick pipeline.
//!
//! Flow, per source and per item in fetch order:
//! 1. Seen-set gate — mark the ID before relevance filtering, so an
//!    inspected item is never re-inspected even when filtered out
//! 2. Keyword filter over the title
//! 3. Enrich: predict category from the untranslated title, translate
//!    title + body excerpt
//! 4. Insert into the approval queue
//! 5. DM the operator a review notice
//!
//! A failed source is logged and skipped; the remaining sources still
//! run. Nothing in here aborts the tick.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::approvals::queue::ApprovalQueue;
use crate::channels::Messenger;
use crate::classify::CategoryClassifier;
use crate::config::BotConfig;
use crate::error::Error;
use crate::pipeline::dedup::SeenSet;
use crate::pipeline::filter::KeywordFilter;
use crate::pipeline::types::{CandidateItem, EnrichedItem, SourceConnector};
use crate::translate::TranslationAdapter;

/// Counts from a single ingest tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub queued: usize,
    pub already_seen: usize,
    pub irrelevant: usize,
    pub source_errors: usize,
    pub item_errors: usize,
}

enum ItemOutcome {
    Queued,
    AlreadySeen,
    Irrelevant,
}

/// Owns the per-tick pipeline state and its collaborators.
pub struct IngestProcessor {
    connector: Arc<dyn SourceConnector>,
    messenger: Arc<dyn Messenger>,
    queue: Arc<ApprovalQueue>,
    classifier: Arc<CategoryClassifier>,
    translator: TranslationAdapter,
    filter: KeywordFilter,
    /// Gate over already-evaluated IDs. Checked and updated before any
    /// suspension for the item, so a command racing with the tick can
    /// never collide on the same key.
    seen: RwLock<SeenSet>,
    sources: Vec<String>,
    fetch_limit: usize,
    excerpt_chars: usize,
    admin_user: String,
}

impl IngestProcessor {
    pub fn new(
        connector: Arc<dyn SourceConnector>,
        messenger: Arc<dyn Messenger>,
        queue: Arc<ApprovalQueue>,
        classifier: Arc<CategoryClassifier>,
        translator: TranslationAdapter,
        config: &BotConfig,
    ) -> Self {
        let seen = match config.seen_capacity {
            Some(capacity) => SeenSet::with_capacity(capacity),
            None => SeenSet::unbounded(),
        };

        Self {
            connector,
            messenger,
            queue,
            classifier,
            translator,
            filter: KeywordFilter::new(&config.keywords),
            seen: RwLock::new(seen),
            sources: config.sources.clone(),
            fetch_limit: config.fetch_limit,
            excerpt_chars: config.excerpt_chars,
            admin_user: config.admin_user.clone(),
        }
    }

    /// Run one ingest tick over all configured sources, in declared
    /// order.
    pub async fn run_once(&self) -> IngestSummary {
        let mut summary = IngestSummary::default();

        for source in &self.sources {
            let items = match self.connector.list_new(source, self.fetch_limit).await {
                Ok(items) => items,
                Err(e) => {
                    warn!(source = %source, error = %e, "source fetch failed, skipping until next tick");
                    summary.source_errors += 1;
                    continue;
                }
            };

            for item in items {
                let item_id = item.id.clone();
                match self.process_item(item).await {
                    Ok(ItemOutcome::Queued) => summary.queued += 1,
                    Ok(ItemOutcome::AlreadySeen) => summary.already_seen += 1,
                    Ok(ItemOutcome::Irrelevant) => summary.irrelevant += 1,
                    Err(e) => {
                        error!(source = %source, item_id = %item_id, error = %e, "item enrichment failed");
                        summary.item_errors += 1;
                    }
                }
            }
        }

        summary
    }

    async fn process_item(&self, item: CandidateItem) -> Result<ItemOutcome, Error> {
        if !self.seen.write().await.insert(&item.id) {
            return Ok(ItemOutcome::AlreadySeen);
        }

        if !self.filter.is_relevant(&item.title) {
            debug!(item_id = %item.id, "title matched no keyword, discarding");
            return Ok(ItemOutcome::Irrelevant);
        }

        // Category comes from the untranslated title. A classifier
        // failure skips the item: nothing is queued without a category.
        let category = self.classifier.predict(&item.title)?.to_string();

        let title = self.translator.translate_or_original(&item.title).await;
        let body_excerpt: String = item.body.chars().take(self.excerpt_chars).collect();
        let excerpt = self.translator.translate_or_original(&body_excerpt).await;

        let enriched = EnrichedItem {
            id: item.id,
            title,
            excerpt,
            category,
            source_url: item.permalink,
            source: item.source,
            enqueued_at: Utc::now(),
        };

        self.queue.insert(enriched.clone()).await;

        let notice = format_review_notice(&enriched);
        if let Err(e) = self.messenger.send_direct(&self.admin_user, &notice).await {
            // The item is already pending; the operator can still act
            // on it via the queue even without the notice.
            warn!(item_id = %enriched.id, error = %e, "review notice delivery failed");
        }

        Ok(ItemOutcome::Queued)
    }
}

/// Review DM layout: what arrived, how it was categorized, and how to
/// decide it.
fn format_review_notice(item: &EnrichedItem) -> String {
    format!(
        "📝 New post pending review: {title}\n\n\
         {excerpt}\n\n\
         Suggested hashtag: {category}\n\
         Approve: /approve {id}\n\
         Reject: /reject {id}\n\
         Original link: {url}",
        title = item.title,
        excerpt = item.excerpt,
        category = item.category,
        id = item.id,
        url = item.source_url,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_notice_carries_decision_instructions() {
        let item = EnrichedItem {
            id: "a1".into(),
            title: "Cần trợ giúp việc nhỏ".into(),
            excerpt: "Chi tiết".into(),
            category: "#Design".into(),
            source_url: "https://reddit.com/r/slavelabour/comments/a1".into(),
            source: "slavelabour".into(),
            enqueued_at: Utc::now(),
        };

        let notice = format_review_notice(&item);
        assert!(notice.contains("/approve a1"));
        assert!(notice.contains("/reject a1"));
        assert!(notice.contains("#Design"));
        assert!(notice.contains("https://reddit.com/r/slavelabour/comments/a1"));
    }
}
