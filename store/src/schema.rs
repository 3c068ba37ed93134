//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary account records, keyed by `user_id` (big-endian i64).
    pub const ACCOUNTS: &str = "accounts";

    /// Blacklisted user ids. Value is empty (set membership only).
    pub const BLACKLIST: &str = "blacklist";

    /// Additional admin user ids. Value is empty (set membership only).
    pub const ADMINS: &str = "admins";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::ACCOUNTS, cf::BLACKLIST, cf::ADMINS]
}
