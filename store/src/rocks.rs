//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options,
};

use eagle_core::{UserAccount, UserId};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// `RocksDB`-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Set or clear membership of a user id in a set-shaped column family.
    fn set_membership(&self, cf_name: &str, user_id: UserId, present: bool) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let key = keys::user_key(user_id);

        if present {
            self.db
                .put_cf(&cf, key, [])
                .map_err(|e| StoreError::Database(e.to_string()))
        } else {
            self.db
                .delete_cf(&cf, key)
                .map_err(|e| StoreError::Database(e.to_string()))
        }
    }

    /// List every user id in a set-shaped column family.
    fn list_membership(&self, cf_name: &str) -> Result<Vec<UserId>> {
        let cf = self.cf(cf_name)?;
        let mut ids = Vec::new();

        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if let Some(id) = keys::decode_user_key(&key) {
                ids.push(id);
            } else {
                tracing::warn!(cf = cf_name, "skipping malformed key in column family");
            }
        }

        Ok(ids)
    }
}

impl Store for RocksStore {
    fn put_account(&self, account: &UserAccount) -> Result<()> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::user_key(account.user_id);
        let value = Self::serialize(account)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_account(&self, user_id: UserId) -> Result<Option<UserAccount>> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::user_key(user_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_accounts(&self) -> Result<Vec<UserAccount>> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let mut accounts = Vec::new();

        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            accounts.push(Self::deserialize(&value)?);
        }

        Ok(accounts)
    }

    fn add_blacklisted(&self, user_id: UserId) -> Result<()> {
        self.set_membership(cf::BLACKLIST, user_id, true)
    }

    fn remove_blacklisted(&self, user_id: UserId) -> Result<()> {
        self.set_membership(cf::BLACKLIST, user_id, false)
    }

    fn list_blacklisted(&self) -> Result<Vec<UserId>> {
        self.list_membership(cf::BLACKLIST)
    }

    fn add_admin(&self, user_id: UserId) -> Result<()> {
        self.set_membership(cf::ADMINS, user_id, true)
    }

    fn remove_admin(&self, user_id: UserId) -> Result<()> {
        self.set_membership(cf::ADMINS, user_id, false)
    }

    fn list_admins(&self) -> Result<Vec<UserId>> {
        self.list_membership(cf::ADMINS)
    }
}
