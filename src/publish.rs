//! Publisher — formats an approved item and sends it to the feed channel.
//!
//! Called only after the operator approves an item — there is no
//! automatic publish path.

use std::sync::Arc;

use tracing::info;

use crate::channels::Messenger;
use crate::error::ChannelError;
use crate::pipeline::types::EnrichedItem;

pub struct Publisher {
    messenger: Arc<dyn Messenger>,
    feed_channel: String,
}

impl Publisher {
    pub fn new(messenger: Arc<dyn Messenger>, feed_channel: impl Into<String>) -> Self {
        Self {
            messenger,
            feed_channel: feed_channel.into(),
        }
    }

    /// Send the formatted item to the feed channel. A failure here
    /// surfaces to the command handler, which keeps the item pending.
    pub async fn publish(&self, item: &EnrichedItem) -> Result<(), ChannelError> {
        let text = format_post(item);
        self.messenger
            .send_channel(&self.feed_channel, &text)
            .await?;

        info!(
            item_id = %item.id,
            channel = %self.feed_channel,
            category = %item.category,
            "approved item published"
        );
        Ok(())
    }
}

/// Feed message layout: title, excerpt, category hashtag, source link.
pub fn format_post(item: &EnrichedItem) -> String {
    format!(
        "*{title}*\n\n{excerpt}\n\n{category}\nSource: {url}",
        title = item.title,
        excerpt = item.excerpt,
        category = item.category,
        url = item.source_url,
    )
}
