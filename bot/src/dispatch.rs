//! The query dispatcher.
//!
//! Runs one search end-to-end: gate check, balance check, debit, lookup
//! call, and either report-cache population or an automatic refund. One
//! attempt against the Lookup Service, fail fast, no retries.
//!
//! The ledger is consistent before any outcome is rendered: a failed
//! attempt is refunded exactly once, and a successful attempt stays debited
//! regardless of what happens to the rendering downstream.

use std::sync::Arc;

use eagle_core::{report, DenyReason, Result, SessionId, UpstreamEnvelope, UserId};
use eagle_lookup::LookupClient;

use crate::cache::ReportCache;
use crate::gate::{AccessGate, GateDecision};
use crate::gateway::MessagingGateway;
use crate::ledger::Ledger;

/// The outcome of one search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The gate turned the user away; no credit was touched.
    Denied(DenyReason),

    /// The balance was already empty; no debit occurred.
    OutOfCredits,

    /// The lookup failed (transport, API error or malformed envelope). The
    /// spent credit has been refunded.
    ProcessingError {
        /// Balance after the refund.
        balance: i64,
    },

    /// The upstream explicitly found nothing. The spent credit has been
    /// refunded.
    NoResults {
        /// Balance after the refund.
        balance: i64,
    },

    /// The report is cached and ready to page through.
    Success {
        /// Session id addressing the cached report.
        session: SessionId,
        /// Number of pages in the report.
        page_count: usize,
        /// Balance after the debit.
        balance: i64,
    },
}

/// Orchestrates gate, ledger, lookup and report cache for search queries.
pub struct QueryDispatcher {
    ledger: Arc<Ledger>,
    cache: Arc<ReportCache>,
    lookup: Arc<LookupClient>,
    gate: AccessGate,
}

impl QueryDispatcher {
    /// Wire up a dispatcher.
    #[must_use]
    pub fn new(
        ledger: Arc<Ledger>,
        cache: Arc<ReportCache>,
        lookup: Arc<LookupClient>,
        gate: AccessGate,
    ) -> Self {
        Self {
            ledger,
            cache,
            lookup,
            gate,
        }
    }

    /// The access gate, shared with the router for non-search events.
    #[must_use]
    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// Run one query for a user.
    ///
    /// # Errors
    ///
    /// Returns [`eagle_core::EagleError::Storage`] if a ledger write fails;
    /// every lookup-level failure is a normal [`SearchOutcome`], not an
    /// error.
    pub async fn execute(
        &self,
        gateway: &dyn MessagingGateway,
        user: UserId,
        query: &str,
    ) -> Result<SearchOutcome> {
        // 1. Gate, before any credit is touched.
        if let GateDecision::Deny(reason) = self.gate.evaluate(&self.ledger, gateway, user).await {
            return Ok(SearchOutcome::Denied(reason));
        }

        // 2. Balance check. A user without an account has nothing to spend.
        let has_credits = self.ledger.get(user).is_some_and(|a| a.has_credits());
        if !has_credits {
            return Ok(SearchOutcome::OutOfCredits);
        }

        // 3. Debit.
        let balance = match self.ledger.adjust_credits(user, -1) {
            Ok(balance) => balance,
            Err(eagle_core::EagleError::InsufficientBalance { .. }) => {
                return Ok(SearchOutcome::OutOfCredits);
            }
            Err(e) => return Err(e),
        };

        // 4. One attempt against the Lookup Service.
        let envelope = match self.lookup.search(query).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(user_id = %user, error = %e, "lookup failed, refunding");
                let balance = self.ledger.adjust_credits(user, 1)?;
                return Ok(SearchOutcome::ProcessingError { balance });
            }
        };

        // 5. Outcome.
        let sections = match envelope {
            UpstreamEnvelope::NoResults => {
                let balance = self.ledger.adjust_credits(user, 1)?;
                return Ok(SearchOutcome::NoResults { balance });
            }
            UpstreamEnvelope::Error(code) => {
                // The client surfaces error envelopes as `Err`; kept for
                // completeness so a future client change cannot skip the
                // refund.
                tracing::warn!(user_id = %user, code = %code, "error envelope, refunding");
                let balance = self.ledger.adjust_credits(user, 1)?;
                return Ok(SearchOutcome::ProcessingError { balance });
            }
            UpstreamEnvelope::Results(sections) => sections,
        };

        let pages = report::build_pages(&sections);
        if pages.is_empty() {
            // An empty result list without the explicit marker still has
            // nothing to show.
            let balance = self.ledger.adjust_credits(user, 1)?;
            return Ok(SearchOutcome::NoResults { balance });
        }

        let session = SessionId::generate();
        let page_count = pages.len();
        self.cache.store(session, pages);

        tracing::info!(
            user_id = %user,
            session_id = %session,
            page_count,
            balance,
            "search completed"
        );
        Ok(SearchOutcome::Success {
            session,
            page_count,
            balance,
        })
    }
}
