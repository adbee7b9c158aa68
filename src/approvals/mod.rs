//! Human approval workflow: pending queue and moderation commands.

pub mod commands;
pub mod queue;

pub use commands::{Command, CommandHandler};
pub use queue::ApprovalQueue;
