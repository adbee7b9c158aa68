//! Messaging channel abstraction for message I/O.

pub mod telegram;

pub use telegram::TelegramChannel;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::approvals::commands::Command;
use crate::error::ChannelError;

/// Trait for outbound messaging — delivers formatted text to a user
/// or to a channel. Moderation logic never lives here.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver a message directly to a user.
    async fn send_direct(&self, user_id: &str, text: &str) -> Result<(), ChannelError>;

    /// Deliver a message to a channel.
    async fn send_channel(&self, channel_id: &str, text: &str) -> Result<(), ChannelError>;
}

/// An inbound moderation command together with the identity that
/// issued it and where the acknowledgment should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Identity of the invoking user, checked against the admin.
    pub caller: String,
    /// Chat the command arrived in; acknowledgments are sent back here.
    pub reply_to: String,
    pub command: Command,
}

/// Stream of inbound command invocations.
pub type CommandStream = Pin<Box<dyn Stream<Item = CommandInvocation> + Send>>;
