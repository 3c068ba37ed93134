//! The access gate.
//!
//! Composes the blacklist check and the group-membership probe into one
//! allow/deny decision, evaluated before any credit is spent or refunded.
//! Checks run cheapest first and short-circuit; a probe failure denies
//! (granting access is the higher-risk error).

use eagle_core::{DenyReason, UserId};

use crate::config::GroupCheck;
use crate::gateway::MessagingGateway;
use crate::ledger::Ledger;

/// The gate's decision for one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The user may proceed.
    Allow,

    /// The user is turned away; the reason drives the rendered response.
    Deny(DenyReason),
}

/// Front-door policy: blacklist, then group membership.
pub struct AccessGate {
    group: GroupCheck,
}

impl AccessGate {
    /// Create a gate with the configured group requirement.
    #[must_use]
    pub fn new(group: GroupCheck) -> Self {
        Self { group }
    }

    /// Evaluate the gate for a user.
    pub async fn evaluate(
        &self,
        ledger: &Ledger,
        gateway: &dyn MessagingGateway,
        user: UserId,
    ) -> GateDecision {
        if ledger.is_blacklisted(user) {
            return GateDecision::Deny(DenyReason::Blacklisted);
        }

        if let GroupCheck::Enabled { chat_id, handle } = &self.group {
            match gateway.member_status(*chat_id, user).await {
                Ok(status) if status.is_present() => {}
                Ok(status) => {
                    tracing::debug!(user_id = %user, ?status, "membership check failed");
                    return GateDecision::Deny(DenyReason::NotMember {
                        group_handle: handle.clone(),
                    });
                }
                Err(e) => {
                    // Fail closed: a probe we cannot complete is a denial.
                    tracing::warn!(user_id = %user, error = %e, "membership probe failed");
                    return GateDecision::Deny(DenyReason::NotMember {
                        group_handle: handle.clone(),
                    });
                }
            }
        }

        GateDecision::Allow
    }
}
