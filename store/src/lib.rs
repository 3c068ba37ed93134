//! `RocksDB` storage layer for the Eagle lookup bot.
//!
//! This crate persists the three ledger collections — accounts, blacklist
//! and admin set — using `RocksDB` with one column family per collection.
//!
//! The in-process ledger owns all reads after startup; this layer exists so
//! that every acknowledged mutation survives a crash. Writes are synchronous:
//! `put` returns only after the write is durable in the database.
//!
//! # Example
//!
//! ```no_run
//! use eagle_store::{RocksStore, Store};
//! use eagle_core::{UserAccount, UserId};
//!
//! let store = RocksStore::open("/tmp/eagle-db").unwrap();
//!
//! let account = UserAccount::new(UserId::new(42), 4, None);
//! store.put_account(&account).unwrap();
//!
//! let loaded = store.get_account(UserId::new(42)).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use eagle_core::{UserAccount, UserId};

/// The storage trait defining all persistence operations.
///
/// This abstracts the storage layer so the ledger can be tested against an
/// in-memory implementation.
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Insert or update an account record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_account(&self, account: &UserAccount) -> Result<()>;

    /// Get an account by user id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account(&self, user_id: UserId) -> Result<Option<UserAccount>>;

    /// Load every account record, for the startup snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_accounts(&self) -> Result<Vec<UserAccount>>;

    // =========================================================================
    // Blacklist Operations
    // =========================================================================

    /// Add a user id to the blacklist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn add_blacklisted(&self, user_id: UserId) -> Result<()>;

    /// Remove a user id from the blacklist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn remove_blacklisted(&self, user_id: UserId) -> Result<()>;

    /// Load the full blacklist, for the startup snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_blacklisted(&self) -> Result<Vec<UserId>>;

    // =========================================================================
    // Admin Set Operations
    // =========================================================================

    /// Add a user id to the additional-admin set. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn add_admin(&self, user_id: UserId) -> Result<()>;

    /// Remove a user id from the additional-admin set. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn remove_admin(&self, user_id: UserId) -> Result<()>;

    /// Load the full admin set, for the startup snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_admins(&self) -> Result<Vec<UserId>>;
}
