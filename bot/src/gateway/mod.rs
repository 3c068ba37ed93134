//! The messaging gateway seam.
//!
//! The bot never talks to the chat platform directly; everything outbound
//! (messages, edits, button acknowledgements) and the group-membership probe
//! go through the [`MessagingGateway`] trait. The production implementation
//! is [`telegram::TelegramGateway`]; tests substitute an in-memory recorder.

pub mod telegram;

use async_trait::async_trait;

use eagle_core::UserId;

use crate::keyboards::ReplyMarkup;

/// A member's status within a group chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    /// Group creator.
    Creator,
    /// Group administrator.
    Administrator,
    /// Ordinary member.
    Member,
    /// Member with restricted permissions (can still read).
    Restricted,
    /// Left the group.
    Left,
    /// Removed from the group.
    Kicked,
}

impl MemberStatus {
    /// Whether this status counts as "present in the group" for gating.
    #[must_use]
    pub const fn is_present(self) -> bool {
        matches!(
            self,
            Self::Creator | Self::Administrator | Self::Member | Self::Restricted
        )
    }
}

/// An outbound message: text plus an optional keyboard.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    /// Message text.
    pub text: String,

    /// Keyboard to attach, if any.
    pub markup: Option<ReplyMarkup>,
}

impl OutgoingMessage {
    /// A plain text message with no keyboard.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: None,
        }
    }

    /// A text message with an attached keyboard.
    #[must_use]
    pub fn with_markup(text: impl Into<String>, markup: ReplyMarkup) -> Self {
        Self {
            text: text.into(),
            markup: Some(markup),
        }
    }
}

/// Error type for gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Transport-level failure (connection error or timeout).
    #[error("gateway transport error: {0}")]
    Transport(String),

    /// The platform API rejected the call.
    #[error("gateway API error: {description}")]
    Api {
        /// The platform's error description.
        description: String,
    },
}

/// Outbound messaging and membership probing.
///
/// Send failures after the ledger is already consistent are best-effort:
/// callers log them and move on rather than unwinding ledger state.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Send a message to a chat.
    async fn send_message(
        &self,
        chat: UserId,
        message: OutgoingMessage,
    ) -> Result<(), GatewayError>;

    /// Replace the text and keyboard of a previously sent message.
    async fn edit_message(
        &self,
        chat: UserId,
        message_id: i64,
        message: OutgoingMessage,
    ) -> Result<(), GatewayError>;

    /// Acknowledge a button press, optionally flashing a short notice.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), GatewayError>;

    /// Probe a user's membership status in a group chat.
    ///
    /// A transport error here is reported as an error, and the access gate
    /// treats it as "not a member" (fail closed).
    async fn member_status(&self, chat: UserId, user: UserId)
        -> Result<MemberStatus, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_statuses() {
        assert!(MemberStatus::Creator.is_present());
        assert!(MemberStatus::Administrator.is_present());
        assert!(MemberStatus::Member.is_present());
        assert!(MemberStatus::Restricted.is_present());
        assert!(!MemberStatus::Left.is_present());
        assert!(!MemberStatus::Kicked.is_present());
    }
}
