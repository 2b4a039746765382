use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::data::StoreRecord;
use crate::config::StorageConfig;
use crate::error::Result;

/// Row operations the persistence guard needs from a drawing catalog.
///
/// Implementations are used from blocking threads only, one call at a time.
pub trait RecordStore: Send + 'static {
    /// Append a record and return its id
    fn insert(&mut self, file_ref: &str, name: &str, author: &str) -> Result<i64>;
    fn count(&self) -> Result<i64>;
    fn exists(&self, id: i64) -> Result<bool>;
    /// Id of the most recently inserted record still present
    fn last_id(&self) -> Result<Option<i64>>;
    fn get(&self, id: i64) -> Result<Option<StoreRecord>>;
    /// All records in insertion order
    fn get_all(&self) -> Result<Vec<StoreRecord>>;
    fn update_details(&mut self, id: i64, name: &str, author: &str) -> Result<()>;
    fn remove(&mut self, id: i64) -> Result<()>;
}

/// The Library manages the SQLite drawing catalog.
/// It stores one row per saved drawing with a reference to its payload file.
///
/// Ids start at 0 and are handed out by a one-row sequence table, so an id
/// is never reused even after its record is removed.
pub struct Library {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl Library {
    /// Open (or create) the catalog described by `config`.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        config.ensure_dirs()?;
        Self::open_at(&config.database_path())
    }

    /// Open (or create) a catalog file at `db_path`.
    pub fn open_at(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        log::info!("📁 Drawing catalog opened at: {}", db_path.display());

        let mut library = Library {
            conn,
            db_path: Some(db_path.to_path_buf()),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// A throwaway catalog that lives only as long as this value.
    pub fn open_in_memory() -> Result<Self> {
        let mut library = Library {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Initialize the database schema.
    /// Creates all necessary tables if they don't exist.
    fn init_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS drawings (
                id              INTEGER PRIMARY KEY,
                file_ref        TEXT NOT NULL UNIQUE,
                name            TEXT NOT NULL,
                author          TEXT NOT NULL,
                created_at      INTEGER NOT NULL
            )",
            [],
        )?;

        // Next id to hand out; a single row
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS drawing_sequence (
                next_id         INTEGER NOT NULL
            )",
            [],
        )?;
        self.conn.execute(
            "INSERT INTO drawing_sequence (next_id)
             SELECT COALESCE((SELECT MAX(id) + 1 FROM drawings), 0)
             WHERE NOT EXISTS (SELECT 1 FROM drawing_sequence)",
            [],
        )?;

        log::debug!("Drawing catalog schema initialized");
        Ok(())
    }

    /// Path to the database file, `None` for in-memory catalogs
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Records whose payload file no longer exists in the payload directory
    pub fn missing_payloads(&self, config: &StorageConfig) -> Result<Vec<StoreRecord>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|record| !config.resolve(&record.file_ref).is_file())
            .collect())
    }

    /// Payload files in the payload directory that no record references.
    /// File refs are resolved the same way loads resolve them.
    pub fn orphaned_payloads(&self, config: &StorageConfig) -> Result<Vec<PathBuf>> {
        let referenced: HashSet<PathBuf> = self
            .get_all()?
            .into_iter()
            .map(|record| config.resolve(&record.file_ref))
            .collect();

        let payload_dir = config.payload_path();
        let mut orphans = Vec::new();
        for entry in WalkDir::new(&payload_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            // In-flight writes; not payloads yet
            if path.extension().map_or(false, |ext| ext == "tmp") {
                continue;
            }
            if !referenced.contains(path) {
                orphans.push(path.to_path_buf());
            }
        }
        orphans.sort();
        Ok(orphans)
    }

    fn record_from_row(row: &Row<'_>) -> rusqlite::Result<StoreRecord> {
        let created_at: i64 = row.get(4)?;
        Ok(StoreRecord {
            id: row.get(0)?,
            file_ref: row.get(1)?,
            name: row.get(2)?,
            author: row.get(3)?,
            created_at: DateTime::<Utc>::from_timestamp(created_at, 0).unwrap_or_default(),
        })
    }
}

impl RecordStore for Library {
    fn insert(&mut self, file_ref: &str, name: &str, author: &str) -> Result<i64> {
        let tx = self.conn.transaction()?;
        let id: i64 = tx.query_row("SELECT next_id FROM drawing_sequence", [], |row| row.get(0))?;
        tx.execute(
            "INSERT INTO drawings (id, file_ref, name, author, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, file_ref, name, author, Utc::now().timestamp()],
        )?;
        tx.execute("UPDATE drawing_sequence SET next_id = ?1", params![id + 1])?;
        tx.commit()?;

        log::debug!("Inserted drawing record {} -> {}", id, file_ref);
        Ok(id)
    }

    fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM drawings", [], |row| row.get(0))?;
        Ok(count)
    }

    fn exists(&self, id: i64) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM drawings WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn last_id(&self) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM drawings ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn get(&self, id: i64) -> Result<Option<StoreRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, file_ref, name, author, created_at FROM drawings WHERE id = ?1",
                params![id],
                Self::record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn get_all(&self) -> Result<Vec<StoreRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, file_ref, name, author, created_at FROM drawings ORDER BY id ASC",
        )?;
        let records = stmt
            .query_map([], Self::record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn update_details(&mut self, id: i64, name: &str, author: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE drawings SET name = ?1, author = ?2 WHERE id = ?3",
            params![name, author, id],
        )?;
        Ok(())
    }

    fn remove(&mut self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM drawings WHERE id = ?1", params![id])?;
        Ok(())
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_insert_gets_zero() {
        let mut library = Library::open_in_memory().unwrap();
        let id = library.insert("drawing_0.json", "A", "me").unwrap();
        assert_eq!(id, 0);
        assert_eq!(library.count().unwrap(), 1);
        assert!(library.exists(0).unwrap());
        assert!(!library.exists(1).unwrap());
    }

    #[test]
    fn test_last_id_on_empty_store() {
        let mut library = Library::open_in_memory().unwrap();
        assert_eq!(library.last_id().unwrap(), None);
        let id = library.insert("a.json", "A", "me").unwrap();
        assert_eq!(library.last_id().unwrap(), Some(id));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut library = Library::open_in_memory().unwrap();
        let first = library.insert("a.json", "A", "me").unwrap();
        let second = library.insert("b.json", "B", "me").unwrap();
        library.remove(second).unwrap();
        let third = library.insert("c.json", "C", "me").unwrap();
        assert!(first < second && second < third);
        assert!(!library.exists(second).unwrap());
    }

    #[test]
    fn test_get_all_in_insertion_order() {
        let mut library = Library::open_in_memory().unwrap();
        for name in ["x", "y", "z"] {
            library.insert(&format!("{name}.json"), name, "me").unwrap();
        }
        let names: Vec<_> = library.get_all().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["x", "y", "z"]);
    }

    #[test]
    fn test_update_details() {
        let mut library = Library::open_in_memory().unwrap();
        let id = library.insert("a.json", "A", "me").unwrap();
        library.update_details(id, "Renamed", "you").unwrap();
        let record = library.get(id).unwrap().unwrap();
        assert_eq!((record.name.as_str(), record.author.as_str()), ("Renamed", "you"));
        assert_eq!(record.file_ref, "a.json");
        assert!(library.get(id + 1).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_file_ref_is_a_store_error() {
        let mut library = Library::open_in_memory().unwrap();
        library.insert("a.json", "A", "me").unwrap();
        let err = library.insert("a.json", "B", "me").unwrap_err();
        assert!(matches!(err, crate::Error::Store(_)));
        // the failed insert consumed nothing
        assert_eq!(library.insert("b.json", "B", "me").unwrap(), 1);
    }

    #[test]
    fn test_payload_scans_resolve_refs_like_loads() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StorageConfig::in_dir(dir.path());
        let mut library = Library::open(&config).unwrap();
        // Loads read only the file name part of a ref
        library.insert("old/location/drawing_0.json", "A", "me").unwrap();
        library.insert("drawing_1.json", "B", "me").unwrap();
        std::fs::write(config.payload_path().join("drawing_0.json"), "[]").unwrap();
        std::fs::write(config.payload_path().join("stray.json"), "[]").unwrap();

        let missing: Vec<_> = library
            .missing_payloads(&config)
            .unwrap()
            .into_iter()
            .map(|r| r.file_ref)
            .collect();
        assert_eq!(missing, ["drawing_1.json"]);
        assert_eq!(
            library.orphaned_payloads(&config).unwrap(),
            vec![config.payload_path().join("stray.json")]
        );
    }
}
