//! Account types for Eagle.
//!
//! This module defines the per-user credit account, including referral
//! tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A credit account for one user.
///
/// The account tracks the spendable credit balance and referral state.
/// Accounts are created on first contact and never deleted; blacklisting is
/// a separate flag kept outside the account record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    /// The user this account belongs to.
    pub user_id: UserId,

    /// Current spendable credit balance. Never negative.
    pub credits: i64,

    /// Cumulative count of successful referrals.
    pub referral_count: u32,

    /// The user who referred this account, set once at creation.
    pub referred_by: Option<UserId>,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Create a new account with the configured initial credit grant.
    #[must_use]
    pub fn new(user_id: UserId, initial_credits: i64, referred_by: Option<UserId>) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            credits: initial_credits,
            referral_count: 0,
            referred_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether a balance change can be applied without going negative.
    #[must_use]
    pub const fn can_adjust(&self, delta: i64) -> bool {
        self.credits + delta >= 0
    }

    /// Check whether the account has any credits left to spend.
    #[must_use]
    pub const fn has_credits(&self) -> bool {
        self.credits > 0
    }
}
