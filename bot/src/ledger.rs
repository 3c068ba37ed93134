//! The credit ledger.
//!
//! Holds the in-process mirror of the three persisted collections (accounts,
//! blacklist, admin set) and funnels every mutation through one
//! serialization point. Reads are served from the mirror; writes go to the
//! store first and only update the mirror once the store has acknowledged,
//! so a crash immediately after an acknowledged mutation never loses or
//! double-applies it.
//!
//! All events are handled one at a time, but the single `RwLock` over the
//! state also makes ledger mutations mutually exclusive per user if a
//! multi-worker loop is ever introduced.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use eagle_core::{EagleError, Result, UserAccount, UserId};
use eagle_store::Store;

struct LedgerState {
    accounts: HashMap<UserId, UserAccount>,
    blacklist: HashSet<UserId>,
    admins: HashSet<UserId>,
}

/// The per-user credit ledger with referral tracking, blacklist and admin
/// set.
pub struct Ledger {
    store: Arc<dyn Store>,
    state: RwLock<LedgerState>,
    primary_admin: UserId,
    initial_credits: i64,
    referrals_per_credit: u32,
}

/// The result of creating (or re-visiting) an account.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    /// The account record after the call.
    pub account: UserAccount,

    /// Whether this call created the account. Referral attribution only
    /// runs for genuinely new accounts.
    pub created: bool,
}

/// The result of recording a successful referral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferralOutcome {
    /// The referrer's referral count after the increment.
    pub referral_count: u32,

    /// Whether this referral crossed the reward threshold and granted a
    /// credit.
    pub credit_awarded: bool,
}

impl Ledger {
    /// Load the ledger from the store's startup snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EagleError::Storage`] if any collection fails to load.
    pub fn load(
        store: Arc<dyn Store>,
        primary_admin: UserId,
        initial_credits: i64,
        referrals_per_credit: u32,
    ) -> Result<Self> {
        let accounts: HashMap<_, _> = store
            .list_accounts()
            .map_err(storage_err)?
            .into_iter()
            .map(|a| (a.user_id, a))
            .collect();
        let blacklist: HashSet<_> = store.list_blacklisted().map_err(storage_err)?.into_iter().collect();
        let admins: HashSet<_> = store.list_admins().map_err(storage_err)?.into_iter().collect();

        tracing::info!(
            accounts = accounts.len(),
            blacklisted = blacklist.len(),
            admins = admins.len(),
            "ledger loaded from store"
        );

        Ok(Self {
            store,
            state: RwLock::new(LedgerState {
                accounts,
                blacklist,
                admins,
            }),
            primary_admin,
            initial_credits,
            referrals_per_credit,
        })
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Get an account by user id.
    #[must_use]
    pub fn get(&self, user_id: UserId) -> Option<UserAccount> {
        self.state
            .read()
            .expect("ledger lock poisoned")
            .accounts
            .get(&user_id)
            .cloned()
    }

    /// Create an account on first contact.
    ///
    /// Idempotent: calling again for an existing user returns the existing
    /// record untouched, and in particular never overwrites `referred_by`.
    ///
    /// # Errors
    ///
    /// Returns [`EagleError::Storage`] if the write-through fails.
    pub fn create_if_absent(
        &self,
        user_id: UserId,
        referrer: Option<UserId>,
    ) -> Result<CreateOutcome> {
        let mut state = self.state.write().expect("ledger lock poisoned");

        if let Some(existing) = state.accounts.get(&user_id) {
            return Ok(CreateOutcome {
                account: existing.clone(),
                created: false,
            });
        }

        let account = UserAccount::new(user_id, self.initial_credits, referrer);
        self.store.put_account(&account).map_err(storage_err)?;
        state.accounts.insert(user_id, account.clone());

        tracing::info!(user_id = %user_id, referrer = ?referrer, "account created");
        Ok(CreateOutcome {
            account,
            created: true,
        })
    }

    /// Apply a balance delta, rejecting any change that would go negative.
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// - [`EagleError::UserNotFound`] if the account does not exist.
    /// - [`EagleError::InsufficientBalance`] if the delta would underflow.
    /// - [`EagleError::Storage`] if the write-through fails.
    pub fn adjust_credits(&self, user_id: UserId, delta: i64) -> Result<i64> {
        let mut state = self.state.write().expect("ledger lock poisoned");

        let account = state
            .accounts
            .get(&user_id)
            .ok_or(EagleError::UserNotFound { user_id })?;

        if !account.can_adjust(delta) {
            return Err(EagleError::InsufficientBalance {
                balance: account.credits,
            });
        }

        let mut updated = account.clone();
        updated.credits += delta;
        updated.updated_at = chrono::Utc::now();

        self.store.put_account(&updated).map_err(storage_err)?;
        let balance = updated.credits;
        state.accounts.insert(user_id, updated);

        tracing::debug!(user_id = %user_id, delta, balance, "credits adjusted");
        Ok(balance)
    }

    /// Record a successful referral for `referrer_id`.
    ///
    /// Every threshold multiple of referrals awards one credit. A referrer
    /// id with no account is a logged no-op (`Ok(None)`), not an error.
    ///
    /// # Errors
    ///
    /// Returns [`EagleError::Storage`] if the write-through fails.
    pub fn record_referral_success(&self, referrer_id: UserId) -> Result<Option<ReferralOutcome>> {
        let mut state = self.state.write().expect("ledger lock poisoned");

        let Some(account) = state.accounts.get(&referrer_id) else {
            tracing::warn!(referrer = %referrer_id, "referrer has no account, ignoring referral");
            return Ok(None);
        };

        let mut updated = account.clone();
        updated.referral_count += 1;
        let credit_awarded = updated.referral_count % self.referrals_per_credit == 0;
        if credit_awarded {
            updated.credits += 1;
        }
        updated.updated_at = chrono::Utc::now();

        self.store.put_account(&updated).map_err(storage_err)?;
        let outcome = ReferralOutcome {
            referral_count: updated.referral_count,
            credit_awarded,
        };
        state.accounts.insert(referrer_id, updated);

        tracing::info!(
            referrer = %referrer_id,
            count = outcome.referral_count,
            awarded = outcome.credit_awarded,
            "referral recorded"
        );
        Ok(Some(outcome))
    }

    /// Set an account's balance to an absolute amount (admin operation).
    ///
    /// Does not auto-create: setting credits for a user that never existed
    /// fails.
    ///
    /// # Errors
    ///
    /// - [`EagleError::InvalidArgument`] if the amount is negative.
    /// - [`EagleError::UserNotFound`] if the account does not exist.
    /// - [`EagleError::Storage`] if the write-through fails.
    pub fn set_credits(&self, user_id: UserId, amount: i64) -> Result<i64> {
        if amount < 0 {
            return Err(EagleError::InvalidArgument(
                "credits cannot be negative".into(),
            ));
        }

        let mut state = self.state.write().expect("ledger lock poisoned");

        let account = state
            .accounts
            .get(&user_id)
            .ok_or(EagleError::UserNotFound { user_id })?;

        let mut updated = account.clone();
        updated.credits = amount;
        updated.updated_at = chrono::Utc::now();

        self.store.put_account(&updated).map_err(storage_err)?;
        state.accounts.insert(user_id, updated);

        tracing::info!(user_id = %user_id, amount, "credits set by admin");
        Ok(amount)
    }

    /// Snapshot every account, for the admin user listing.
    #[must_use]
    pub fn all_accounts(&self) -> Vec<UserAccount> {
        let state = self.state.read().expect("ledger lock poisoned");
        let mut accounts: Vec<_> = state.accounts.values().cloned().collect();
        accounts.sort_by_key(|a| a.user_id);
        accounts
    }

    // =========================================================================
    // Blacklist
    // =========================================================================

    /// Add a user to the blacklist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`EagleError::Storage`] if the write-through fails.
    pub fn blacklist(&self, user_id: UserId) -> Result<()> {
        let mut state = self.state.write().expect("ledger lock poisoned");
        self.store.add_blacklisted(user_id).map_err(storage_err)?;
        state.blacklist.insert(user_id);
        tracing::info!(user_id = %user_id, "user blacklisted");
        Ok(())
    }

    /// Remove a user from the blacklist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`EagleError::Storage`] if the write-through fails.
    pub fn unblacklist(&self, user_id: UserId) -> Result<()> {
        let mut state = self.state.write().expect("ledger lock poisoned");
        self.store.remove_blacklisted(user_id).map_err(storage_err)?;
        state.blacklist.remove(&user_id);
        tracing::info!(user_id = %user_id, "user unblacklisted");
        Ok(())
    }

    /// Whether a user is blacklisted.
    #[must_use]
    pub fn is_blacklisted(&self, user_id: UserId) -> bool {
        self.state
            .read()
            .expect("ledger lock poisoned")
            .blacklist
            .contains(&user_id)
    }

    // =========================================================================
    // Admin set
    // =========================================================================

    /// Add a user to the additional-admin set.
    ///
    /// Returns `false` (without touching the store) if the user is already
    /// an admin, including the primary admin.
    ///
    /// # Errors
    ///
    /// Returns [`EagleError::Storage`] if the write-through fails.
    pub fn add_admin(&self, user_id: UserId) -> Result<bool> {
        let mut state = self.state.write().expect("ledger lock poisoned");
        if user_id == self.primary_admin || state.admins.contains(&user_id) {
            return Ok(false);
        }
        self.store.add_admin(user_id).map_err(storage_err)?;
        state.admins.insert(user_id);
        tracing::info!(user_id = %user_id, "admin added");
        Ok(true)
    }

    /// Remove a user from the additional-admin set.
    ///
    /// Returns `false` if the user was not in the set. The primary admin
    /// cannot be removed.
    ///
    /// # Errors
    ///
    /// Returns [`EagleError::Storage`] if the write-through fails.
    pub fn remove_admin(&self, user_id: UserId) -> Result<bool> {
        let mut state = self.state.write().expect("ledger lock poisoned");
        if !state.admins.contains(&user_id) {
            return Ok(false);
        }
        self.store.remove_admin(user_id).map_err(storage_err)?;
        state.admins.remove(&user_id);
        tracing::info!(user_id = %user_id, "admin removed");
        Ok(true)
    }

    /// Whether a user is the primary admin or in the additional-admin set.
    #[must_use]
    pub fn is_admin(&self, user_id: UserId) -> bool {
        user_id == self.primary_admin
            || self
                .state
                .read()
                .expect("ledger lock poisoned")
                .admins
                .contains(&user_id)
    }
}

fn storage_err(e: eagle_store::StoreError) -> EagleError {
    EagleError::Storage(e.to_string())
}
