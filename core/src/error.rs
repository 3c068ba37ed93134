//! Error types for Eagle.
//!
//! Two pieces of the failure taxonomy are deliberately values rather than
//! error variants: access denial ([`DenyReason`], carried by the gate's
//! decision) and upstream lookup failure (`LookupError` in `eagle-lookup`).
//! Both are normal outcomes of an event — they end the flow with a rendered
//! explanation, never by propagating an error.

use crate::ids::UserId;

/// Result type for Eagle operations.
pub type Result<T> = std::result::Result<T, EagleError>;

/// Why the access gate denied a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The user is on the blacklist.
    Blacklisted,

    /// The user is not a member of the required group. Carries the group
    /// handle so the caller can render a join prompt.
    NotMember {
        /// Public handle of the required group, if one is configured.
        group_handle: Option<String>,
    },
}

/// Errors that can occur while handling an event.
#[derive(Debug, thiserror::Error)]
pub enum EagleError {
    /// A debit would drive the balance below zero.
    #[error("insufficient balance: {balance}")]
    InsufficientBalance {
        /// The balance at the time of the rejected debit.
        balance: i64,
    },

    /// An admin operation referenced a user that never existed.
    #[error("user not found: {user_id}")]
    UserNotFound {
        /// The user id that was not found.
        user_id: UserId,
    },

    /// Malformed admin command arguments.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A pagination request referenced a session id that is no longer
    /// cached (typically after a process restart).
    #[error("report session expired")]
    SessionExpired,

    /// Persistence failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The messaging gateway failed.
    #[error("gateway error: {0}")]
    Gateway(String),
}
