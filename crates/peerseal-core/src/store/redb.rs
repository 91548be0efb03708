//! Redb-backed durable secure store.
//!
//! Uses Redb's ACID transactions with Copy-on-Write for crash safety. All
//! records survive process restarts.
//!
//! Access-policy note: the store records each blob's [`AccessPolicy`], but a
//! successfully opened database is treated as post-first-unlock; gating the
//! database file itself (OS keychain, encrypted volume) is the deployment's
//! concern.

use std::{path::Path, sync::Arc};

use redb::{Database, TableDefinition};

use super::{AccessPolicy, SecretStore, StoreError, StoredRecord};

/// Table: records
/// Key: tag string
/// Value: CBOR-encoded `StoredRecord` (policy + blob)
const RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("records");

/// Durable secure store backed by Redb.
///
/// Thread-safe through Redb's internal locking. Clone is cheap (Arc).
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a Redb database at the given path.
    ///
    /// Creates the RECORDS table if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = Database::create(path.as_ref()).map_err(|e| StoreError::Io(e.to_string()))?;

        let txn = db.begin_write().map_err(|e| StoreError::Io(e.to_string()))?;
        {
            let _ = txn.open_table(RECORDS).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl SecretStore for RedbStore {
    fn put(&self, tag: &str, bytes: &[u8], policy: AccessPolicy) -> Result<(), StoreError> {
        let record = StoredRecord { policy, bytes: bytes.to_vec() };
        let mut encoded = Vec::with_capacity(record.bytes.len() + 16);
        ciborium::into_writer(&record, &mut encoded)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let txn = self.db.begin_write().map_err(|e| StoreError::Io(e.to_string()))?;
        {
            let mut table =
                txn.open_table(RECORDS).map_err(|e| StoreError::Io(e.to_string()))?;
            table
                .insert(tag, encoded.as_slice())
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(())
    }

    fn get(&self, tag: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self.db.begin_read().map_err(|e| StoreError::Io(e.to_string()))?;
        let table = txn.open_table(RECORDS).map_err(|e| StoreError::Io(e.to_string()))?;

        let Some(guard) = table.get(tag).map_err(|e| StoreError::Io(e.to_string()))? else {
            return Ok(None);
        };

        let record: StoredRecord = ciborium::from_reader(guard.value())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        Ok(Some(record.bytes))
    }

    fn delete(&self, tag: &str) -> Result<(), StoreError> {
        let txn = self.db.begin_write().map_err(|e| StoreError::Io(e.to_string()))?;
        {
            let mut table =
                txn.open_table(RECORDS).map_err(|e| StoreError::Io(e.to_string()))?;
            table.remove(tag).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(())
    }
}
