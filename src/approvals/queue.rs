//! Approval queue — in-memory map of enriched items awaiting a decision.
//!
//! Keyed by the source item ID. Items enter after enrichment and leave
//! exactly once: on approve (after a successful publish) or on reject.
//! There is no expiry — undecided items stay pending until the operator
//! acts or the process restarts.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::pipeline::types::EnrichedItem;

/// In-memory queue of pending items, shared between the ingest tick and
/// the command dispatcher. Mutations are short map operations under the
/// write lock; the lock is never held across external I/O.
pub struct ApprovalQueue {
    items: RwLock<HashMap<String, EnrichedItem>>,
}

impl ApprovalQueue {
    /// Create a new, empty approval queue.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            items: RwLock::new(HashMap::new()),
        })
    }

    /// Insert an enriched item keyed by its source item ID.
    ///
    /// Returns false if the ID was already pending (the existing entry
    /// is kept — the dedup gate upstream makes this unreachable in the
    /// normal flow).
    pub async fn insert(&self, item: EnrichedItem) -> bool {
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) {
            debug!(item_id = %item.id, "item already pending, insert ignored");
            return false;
        }

        info!(
            item_id = %item.id,
            source = %item.source,
            category = %item.category,
            "item queued for review"
        );
        items.insert(item.id.clone(), item);
        true
    }

    /// Look up a pending item without removing it.
    pub async fn get(&self, id: &str) -> Option<EnrichedItem> {
        self.items.read().await.get(id).cloned()
    }

    /// Remove a pending item. Returns the item if it was present.
    pub async fn remove(&self, id: &str) -> Option<EnrichedItem> {
        self.items.write().await.remove(id)
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.items.read().await.contains_key(id)
    }

    /// All pending items, oldest first.
    pub async fn pending(&self) -> Vec<EnrichedItem> {
        let items = self.items.read().await;
        let mut pending: Vec<EnrichedItem> = items.values().cloned().collect();
        pending.sort_by(|a, b| a.enqueued_at.cmp(&b.enqueued_at));
        pending
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_item(id: &str) -> EnrichedItem {
        EnrichedItem {
            id: id.to_string(),
            title: "Cần người thiết kế logo".into(),
            excerpt: "Một logo đơn giản".into(),
            category: "#Design".into(),
            source_url: format!("https://reddit.com/r/forhire/comments/{id}"),
            source: "forhire".into(),
            enqueued_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_get() {
        let queue = ApprovalQueue::new();
        assert!(queue.is_empty().await);

        assert!(queue.insert(make_item("p1")).await);
        assert_eq!(queue.len().await, 1);
        assert!(queue.contains("p1").await);

        let item = queue.get("p1").await.unwrap();
        assert_eq!(item.category, "#Design");
        // get does not remove
        assert_eq!(queue.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let queue = ApprovalQueue::new();
        assert!(queue.insert(make_item("p1")).await);
        assert!(!queue.insert(make_item("p1")).await);
        assert_eq!(queue.len().await, 1);
    }

    #[tokio::test]
    async fn remove_is_terminal() {
        let queue = ApprovalQueue::new();
        queue.insert(make_item("p1")).await;

        assert!(queue.remove("p1").await.is_some());
        assert!(queue.remove("p1").await.is_none());
        assert!(!queue.contains("p1").await);
    }

    #[tokio::test]
    async fn pending_is_oldest_first() {
        let queue = ApprovalQueue::new();
        let mut first = make_item("p1");
        first.enqueued_at = Utc::now() - chrono::Duration::seconds(60);
        queue.insert(first).await;
        queue.insert(make_item("p2")).await;

        let pending = queue.pending().await;
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, "p1");
        assert_eq!(pending[1].id, "p2");
    }
}
