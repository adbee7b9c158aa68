//! Moderation commands — parsing and the approve/reject handler.
//!
//! Approve and reject are the only two decision paths out of the
//! approval queue, and both are restricted to the configured admin.
//! Approve publishes before removing, so a failed publish keeps the
//! item pending and the command can simply be retried. Reject is
//! idempotent and acknowledges success even for unknown IDs.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::approvals::queue::ApprovalQueue;
use crate::error::CommandError;
use crate::publish::Publisher;

/// `/approve <id>` or `/reject <id>`, tolerating a `@botname` suffix
/// on the command word.
static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(approve|reject)(?:@\w+)?\s+(\S+)$").unwrap());

/// A parsed moderation command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Approve { item_id: String },
    Reject { item_id: String },
}

impl Command {
    /// Parse a text message into a command. Anything that is not a
    /// well-formed `/approve` or `/reject` returns `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = COMMAND_RE.captures(text.trim())?;
        let item_id = caps[2].to_string();
        match &caps[1] {
            "approve" => Some(Self::Approve { item_id }),
            "reject" => Some(Self::Reject { item_id }),
            _ => None,
        }
    }

    pub fn item_id(&self) -> &str {
        match self {
            Self::Approve { item_id } | Self::Reject { item_id } => item_id,
        }
    }
}

/// Processes inbound approve/reject commands against the queue.
pub struct CommandHandler {
    queue: Arc<ApprovalQueue>,
    publisher: Publisher,
    admin_user: String,
}

impl CommandHandler {
    pub fn new(queue: Arc<ApprovalQueue>, publisher: Publisher, admin_user: &str) -> Self {
        Self {
            queue,
            publisher,
            admin_user: admin_user.to_string(),
        }
    }

    /// Route a parsed command. Returns the acknowledgment text for the
    /// caller on success.
    pub async fn dispatch(&self, caller: &str, command: &Command) -> Result<String, CommandError> {
        match command {
            Command::Approve { item_id } => self.approve(caller, item_id).await,
            Command::Reject { item_id } => self.reject(caller, item_id).await,
        }
    }

    /// Publish a pending item to the feed and remove it from the queue.
    pub async fn approve(&self, caller: &str, item_id: &str) -> Result<String, CommandError> {
        self.authorize(caller)?;

        let item = self
            .queue
            .get(item_id)
            .await
            .ok_or_else(|| CommandError::NotFound {
                id: item_id.to_string(),
            })?;

        // Publish first — removal only happens once the send went out,
        // so a failed publish leaves the item pending for a retry.
        self.publisher.publish(&item).await?;
        self.queue.remove(item_id).await;

        info!(item_id, caller, "item approved and published");
        Ok(format!("✅ Published item {item_id} to the feed."))
    }

    /// Drop a pending item. Succeeds whether or not the ID was pending.
    pub async fn reject(&self, caller: &str, item_id: &str) -> Result<String, CommandError> {
        self.authorize(caller)?;

        if self.queue.remove(item_id).await.is_some() {
            info!(item_id, caller, "item rejected");
        } else {
            debug!(item_id, "reject for unknown item, nothing to do");
        }
        Ok(format!("❌ Rejected item {item_id}."))
    }

    fn authorize(&self, caller: &str) -> Result<(), CommandError> {
        if caller != self.admin_user {
            warn!(caller, "unauthorized moderation attempt");
            return Err(CommandError::Unauthorized);
        }
        Ok(())
    }
}
