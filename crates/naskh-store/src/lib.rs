//! Naskh Store - durable per-node key-value storage
//!
//! A thin wrapper around a single-file redb database holding one `kv` table.
//! Every node owns exactly one store; it is the ground truth for that node's
//! local reads and the unit of durability. All ordering and consistency
//! responsibility lives in the replication layer above, so the store exposes
//! no transactions, batches, or conditional writes.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use tracing::info;

use naskh_core::{Error, Result};

const KV_TABLE: TableDefinition<&str, &str> = TableDefinition::new("kv");

const DB_FILE: &str = "naskh.redb";

fn storage_err(e: impl Display) -> Error {
    Error::Storage(e.to_string())
}

/// Durable key-value store, exclusively owned by one process.
pub struct KeyStore {
    db: Database,
    path: PathBuf,
}

impl KeyStore {
    /// Open (or create) the store under `data_dir`.
    ///
    /// Creates the directory and the `kv` table if they do not exist yet.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;

        let path = data_dir.join(DB_FILE);
        let db = Database::create(&path).map_err(storage_err)?;

        let txn = db.begin_write().map_err(storage_err)?;
        {
            let _ = txn.open_table(KV_TABLE).map_err(storage_err)?;
        }
        txn.commit().map_err(storage_err)?;

        info!("Store initialized at {:?}", path);
        Ok(Self { db, path })
    }

    /// Look up a key. `None` means the key was never set or was deleted,
    /// distinguishable from a key holding an empty string.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let txn = self.db.begin_read().map_err(storage_err)?;
        let table = txn.open_table(KV_TABLE).map_err(storage_err)?;
        let value = table
            .get(key)
            .map_err(storage_err)?
            .map(|guard| guard.value().to_string());
        Ok(value)
    }

    /// Upsert a key. Durable once this returns Ok.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = txn.open_table(KV_TABLE).map_err(storage_err)?;
            table.insert(key, value).map_err(storage_err)?;
        }
        txn.commit().map_err(storage_err)?;
        Ok(())
    }

    /// Remove a key, reporting whether it was present. Deleting an absent
    /// key is not an error.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let txn = self.db.begin_write().map_err(storage_err)?;
        let existed;
        {
            let mut table = txn.open_table(KV_TABLE).map_err(storage_err)?;
            existed = table.remove(key).map_err(storage_err)?.is_some();
        }
        txn.commit().map_err(storage_err)?;
        Ok(existed)
    }

    /// Snapshot of all keys at call time. A single read transaction, so
    /// concurrent mutations do not tear the enumeration.
    pub fn keys(&self) -> Result<Vec<String>> {
        let txn = self.db.begin_read().map_err(storage_err)?;
        let table = txn.open_table(KV_TABLE).map_err(storage_err)?;
        let mut keys = Vec::new();
        for entry in table.iter().map_err(storage_err)? {
            let (key, _) = entry.map_err(storage_err)?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }

    /// Number of entries. Operational introspection only.
    pub fn len(&self) -> Result<u64> {
        let txn = self.db.begin_read().map_err(storage_err)?;
        let table = txn.open_table(KV_TABLE).map_err(storage_err)?;
        table.len().map_err(storage_err)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn open_temp() -> (tempfile::TempDir, KeyStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_set_then_get() {
        let (_dir, store) = open_temp();
        store.set("foo", "bar").unwrap();
        assert_eq!(store.get("foo").unwrap(), Some("bar".to_string()));
    }

    #[test]
    fn test_get_missing_key() {
        let (_dir, store) = open_temp();
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_empty_value_distinct_from_missing() {
        let (_dir, store) = open_temp();
        store.set("empty", "").unwrap();
        assert_eq!(store.get("empty").unwrap(), Some(String::new()));
        assert_eq!(store.get("absent").unwrap(), None);
    }

    #[test]
    fn test_overwrite() {
        let (_dir, store) = open_temp();
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v2".to_string()));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_delete_reports_existence() {
        let (_dir, store) = open_temp();
        store.set("k", "v").unwrap();
        assert!(store.delete("k").unwrap());
        assert_eq!(store.get("k").unwrap(), None);
        // Idempotent: deleting again (or a never-set key) is Ok(false).
        assert!(!store.delete("k").unwrap());
        assert!(!store.delete("never-set").unwrap());
    }

    #[test]
    fn test_keys_and_len() {
        let (_dir, store) = open_temp();
        for i in 0..5 {
            store.set(&format!("key-{i}"), "v").unwrap();
        }
        let mut keys = store.keys().unwrap();
        keys.sort();
        assert_eq!(keys.len(), 5);
        assert_eq!(keys[0], "key-0");
        assert_eq!(store.len().unwrap(), 5);
        assert!(!store.is_empty().unwrap());
    }

    #[test]
    fn test_durability_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = KeyStore::open(dir.path()).unwrap();
            store.set("persistent", "yes").unwrap();
        }
        let store = KeyStore::open(dir.path()).unwrap();
        assert_eq!(store.get("persistent").unwrap(), Some("yes".to_string()));
    }

    #[test]
    fn test_keys_snapshot_under_concurrent_writes() {
        let (_dir, store) = open_temp();
        let store = Arc::new(store);
        for i in 0..20 {
            store.set(&format!("k{i}"), "v").unwrap();
        }

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..50 {
                    store.set(&format!("w{i}"), "v").unwrap();
                    store.delete(&format!("k{}", i % 20)).unwrap();
                }
            })
        };

        // Every enumeration must be internally consistent: no duplicates,
        // no panics, regardless of racing mutations.
        for _ in 0..10 {
            let keys = store.keys().unwrap();
            let mut deduped = keys.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(keys.len(), deduped.len());
        }

        writer.join().unwrap();
    }
}
