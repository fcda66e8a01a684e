// ============================================================================
// StorefrontDb: Local Key-Value Store (redb)
// ============================================================================
// Persistent local state for the cart and the session, partitioned by fixed
// keys inside a single table. Values are JSON documents.
// Default path: ~/.nexusgear/storefront.redb (override via NEXUSGEAR_DB_PATH)
// ============================================================================

mod memory;

pub use memory::MemoryStore;

use anyhow::{anyhow, Result};
use redb::{Database, TableDefinition};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Key holding the serialized cart lines
pub const CART_KEY: &str = "nexusgear-cart";

/// Key holding the serialized signed-in identity
pub const SESSION_KEY: &str = "nexusgear-user";

const LOCAL_STATE: TableDefinition<&str, &[u8]> = TableDefinition::new("local_state");

/// Byte-level key-value store the state containers persist into.
/// Every write replaces the whole value under its key.
pub trait KeyValueStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn put_raw(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Returns whether a value was present
    fn remove(&self, key: &str) -> Result<bool>;

    fn keys(&self) -> Result<Vec<String>>;
}

/// Serialize `value` as JSON under `key`
pub fn store_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| anyhow!("Failed to serialize {}: {}", key, e))?;
    store.put_raw(key, &bytes)
}

/// Decode a JSON value previously read from `key`
pub fn decode_json<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| anyhow!("Failed to deserialize {}: {}", key, e))
}

/// Embedded database backing the storefront's local state
pub struct StorefrontDb {
    db: Database,
    path: PathBuf,
}

impl StorefrontDb {
    /// Open (or create) the database at the given path.
    /// If `path` is None, uses NEXUSGEAR_DB_PATH or ~/.nexusgear/storefront.redb
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let db_path = match path {
            Some(p) => p.to_path_buf(),
            None => default_db_path()?,
        };

        info!("Opening database at: {}", db_path.display());

        let db = Database::create(&db_path)
            .map_err(|e| anyhow!("Failed to open database: {}", e))?;

        // Ensure the table exists by doing a write transaction
        let write_txn = db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let _ = write_txn
                .open_table(LOCAL_STATE)
                .map_err(|e| anyhow!("Failed to create local_state table: {}", e))?;
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit init: {}", e))?;

        Ok(Self { db, path: db_path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn default_db_path() -> Result<PathBuf> {
    if let Ok(env_path) = std::env::var("NEXUSGEAR_DB_PATH") {
        return Ok(PathBuf::from(env_path));
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
    let dir = home.join(".nexusgear");
    std::fs::create_dir_all(&dir)
        .map_err(|e| anyhow!("Failed to create .nexusgear directory: {}", e))?;
    Ok(dir.join("storefront.redb"))
}

impl KeyValueStore for StorefrontDb {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn.open_table(LOCAL_STATE)
            .map_err(|e| anyhow!("Failed to open local_state table: {}", e))?;

        let value = table.get(key)
            .map_err(|e| anyhow!("Failed to get {}: {}", key, e))?
            .map(|v| v.value().to_vec());
        Ok(value)
    }

    fn put_raw(&self, key: &str, value: &[u8]) -> Result<()> {
        let write_txn = self.db.begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let mut table = write_txn.open_table(LOCAL_STATE)
                .map_err(|e| anyhow!("Failed to open local_state table: {}", e))?;
            table.insert(key, value)
                .map_err(|e| anyhow!("Failed to insert {}: {}", key, e))?;
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit: {}", e))?;

        debug!("Stored {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        let removed;
        {
            let mut table = write_txn.open_table(LOCAL_STATE)
                .map_err(|e| anyhow!("Failed to open local_state table: {}", e))?;
            removed = table.remove(key)
                .map_err(|e| anyhow!("Failed to remove {}: {}", key, e))?
                .is_some();
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit delete: {}", e))?;

        if removed {
            debug!("Removed {}", key);
        }
        Ok(removed)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let read_txn = self.db.begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn.open_table(LOCAL_STATE)
            .map_err(|e| anyhow!("Failed to open local_state table: {}", e))?;

        let mut keys = Vec::new();
        let iter = table.range::<&str>(..)
            .map_err(|e| anyhow!("Failed to iterate local_state: {}", e))?;
        for entry in iter {
            let (key, _value) = entry.map_err(|e| anyhow!("Failed to read entry: {}", e))?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::temp_db_path;
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let path = temp_db_path();
        let db = StorefrontDb::open(Some(&path)).unwrap();

        assert!(db.get_raw(CART_KEY).unwrap().is_none());
        db.put_raw(CART_KEY, b"[]").unwrap();
        assert_eq!(db.get_raw(CART_KEY).unwrap().as_deref(), Some(&b"[]"[..]));

        db.put_raw(SESSION_KEY, b"{}").unwrap();
        let mut keys = db.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec![CART_KEY.to_string(), SESSION_KEY.to_string()]);

        assert!(db.remove(CART_KEY).unwrap());
        assert!(!db.remove(CART_KEY).unwrap());

        drop(db);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_db_path();
        {
            let db = StorefrontDb::open(Some(&path)).unwrap();
            store_json(&db, SESSION_KEY, &vec!["a", "b"]).unwrap();
        }
        let db = StorefrontDb::open(Some(&path)).unwrap();
        let bytes = db.get_raw(SESSION_KEY).unwrap().unwrap();
        let value: Vec<String> = decode_json(SESSION_KEY, &bytes).unwrap();
        assert_eq!(value, vec!["a".to_string(), "b".to_string()]);

        drop(db);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_decode_json_reports_corrupt_values() {
        let result: Result<Vec<String>> = decode_json(CART_KEY, b"not json");
        assert!(result.is_err());
    }
}
