use std::pin::pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Notify, Semaphore, SemaphorePermit};

use super::files::{payload_file_name, read_payload, write_payload};
use crate::codec;
use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::state::data::{Drawing, StoreRecord};
use crate::state::library::{Library, RecordStore};

/// A drawing that could not be loaded
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDrawing {
    pub id: i64,
    pub file_ref: String,
    pub reason: String,
    /// True when the payload was unreadable JSON rather than missing or unreadable on disk
    pub corrupt: bool,
}

/// Result of loading every drawing
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub drawings: Vec<Drawing>,
    pub skipped: Vec<SkippedDrawing>,
}

/// Consistency problems between the catalog and the payload directory
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    /// Records whose payload file is gone
    pub missing: Vec<StoreRecord>,
    /// Payload files no record points at
    pub orphaned: Vec<std::path::PathBuf>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty()
    }
}

/// Persists drawings and loads them back without torn reads.
///
/// Saves and loads share a single permit, so at most one of them touches the
/// store and the payload files at a time. Saves announce themselves before
/// queueing for the permit; a load waits for announced saves to finish, and
/// if one is announced while it is reading, it reads again. A load therefore
/// includes every save that started before the load released the permit.
///
/// The permit and the announcement are both held by guards that release on
/// drop, so an error, panic or cancelled task can't wedge later operations.
pub struct DrawingVault<S: RecordStore = Library> {
    store: Arc<Mutex<S>>,
    config: StorageConfig,
    permit: Semaphore,
    pending_saves: AtomicUsize,
    save_finished: Notify,
}

/// Marks a save as in flight for as long as it lives
struct SaveTicket<'a> {
    pending: &'a AtomicUsize,
    finished: &'a Notify,
}

impl<'a> SaveTicket<'a> {
    fn announce(pending: &'a AtomicUsize, finished: &'a Notify) -> Self {
        pending.fetch_add(1, Ordering::AcqRel);
        Self { pending, finished }
    }
}

impl Drop for SaveTicket<'_> {
    fn drop(&mut self) {
        self.pending.fetch_sub(1, Ordering::AcqRel);
        self.finished.notify_waiters();
    }
}

struct Slot {
    id: i64,
    file_ref: String,
    created: bool,
}

impl DrawingVault<Library> {
    /// Open the SQLite catalog described by `config` and guard it.
    pub fn open(config: StorageConfig) -> Result<Self> {
        let library = Library::open(&config)?;
        let count = library.count()?;
        log::info!("🎨 Drawing vault ready with {} drawings", count);
        Ok(Self::new(library, config))
    }

    /// Compare the catalog with the payload directory.
    pub async fn verify(&self) -> Result<VerifyReport> {
        let _permit = self.acquire().await?;
        let config = self.config.clone();
        let report = self
            .with_store(move |library| {
                Ok(VerifyReport {
                    missing: library.missing_payloads(&config)?,
                    orphaned: library.orphaned_payloads(&config)?,
                })
            })
            .await?;

        if !report.is_clean() {
            log::warn!(
                "⚠️  {} drawings without payload, {} orphaned payload files",
                report.missing.len(),
                report.orphaned.len()
            );
        }
        Ok(report)
    }
}

impl<S: RecordStore> DrawingVault<S> {
    pub fn new(store: S, config: StorageConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            config,
            permit: Semaphore::new(1),
            pending_saves: AtomicUsize::new(0),
            save_finished: Notify::new(),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Number of saves announced and not yet finished
    pub fn pending_saves(&self) -> usize {
        self.pending_saves.load(Ordering::Acquire)
    }

    /// Persist `drawing` and return its store id.
    ///
    /// A drawing whose id names an existing record overwrites that record's
    /// payload and refreshes its name and author. Anything else gets a new
    /// record, with a payload file named after the current record count.
    /// If the payload write fails, a record created by this call is removed
    /// again and the error is returned.
    pub async fn save(&self, drawing: &Drawing) -> Result<i64> {
        let _ticket = SaveTicket::announce(&self.pending_saves, &self.save_finished);
        let _permit = self.acquire().await?;

        let payload = codec::encode_drawing(drawing, self.config.sample_step)?;
        let (existing, name, author) = (drawing.id, drawing.name.clone(), drawing.author.clone());
        let slot = self
            .with_store(move |store| {
                if let Some(id) = existing {
                    if let Some(record) = store.get(id)? {
                        store.update_details(id, &name, &author)?;
                        return Ok(Slot {
                            id,
                            file_ref: record.file_ref,
                            created: false,
                        });
                    }
                }
                let file_ref = payload_file_name(store.count()?);
                let id = store.insert(&file_ref, &name, &author)?;
                Ok(Slot {
                    id,
                    file_ref,
                    created: true,
                })
            })
            .await?;

        let path = self.config.resolve(&slot.file_ref);
        if let Err(err) = write_payload(&path, &payload).await {
            log::error!("Error saving drawing {}: {}", slot.id, err);
            if slot.created {
                let id = slot.id;
                if let Err(e) = self.with_store(move |store| store.remove(id)).await {
                    log::error!("Could not roll back drawing record {}: {}", id, e);
                }
            }
            return Err(err);
        }

        if slot.created {
            log::info!("Inserted drawing {} as {}", slot.id, slot.file_ref);
        } else {
            log::info!("Updated drawing {} in {}", slot.id, slot.file_ref);
        }
        Ok(slot.id)
    }

    /// Load every drawing, skipping (and logging) ones that can't be read.
    pub async fn load_all(&self) -> Result<Vec<Drawing>> {
        Ok(self.load_all_detailed().await?.drawings)
    }

    /// Like [`load_all`](Self::load_all), also reporting what was skipped.
    pub async fn load_all_detailed(&self) -> Result<LoadReport> {
        loop {
            self.wait_for_saves().await;
            let permit = self.acquire().await?;
            if self.pending_saves() > 0 {
                // A save queued up between the wait and the acquire
                drop(permit);
                continue;
            }

            let report = self.read_all().await?;
            if self.pending_saves() == 0 {
                log::debug!(
                    "Loaded {} drawings, skipped {}",
                    report.drawings.len(),
                    report.skipped.len()
                );
                return Ok(report);
            }
            drop(permit);
            log::debug!("Save started during load, reloading");
        }
    }

    /// Catalog rows in insertion order, read under the guard
    pub async fn records(&self) -> Result<Vec<StoreRecord>> {
        let _permit = self.acquire().await?;
        self.with_store(|store| store.get_all()).await
    }

    /// Stop accepting saves and loads; queued ones fail with `GuardClosed`.
    pub fn close(&self) {
        self.permit.close();
    }

    async fn acquire(&self) -> Result<SemaphorePermit<'_>> {
        self.permit.acquire().await.map_err(|_| Error::GuardClosed)
    }

    async fn wait_for_saves(&self) {
        loop {
            let mut notified = pin!(self.save_finished.notified());
            // Register before checking, so a save finishing in between still wakes us
            notified.as_mut().enable();
            if self.pending_saves() == 0 {
                return;
            }
            notified.await;
        }
    }

    async fn read_all(&self) -> Result<LoadReport> {
        let records = self.with_store(|store| store.get_all()).await?;
        let mut report = LoadReport::default();

        for record in records {
            let path = self.config.resolve(&record.file_ref);
            let loaded = match read_payload(&path).await {
                Ok(json) => {
                    codec::decode_drawing(&json, Some(record.id), &record.name, &record.author)
                }
                Err(e) => Err(e),
            };
            match loaded {
                Ok(drawing) => report.drawings.push(drawing),
                Err(e) => {
                    log::error!("Skipping drawing {} ({}): {}", record.id, record.file_ref, e);
                    report.skipped.push(SkippedDrawing {
                        id: record.id,
                        file_ref: record.file_ref,
                        reason: e.to_string(),
                        corrupt: e.is_corrupt_payload(),
                    });
                }
            }
        }
        Ok(report)
    }

    /// Run a store operation on the blocking pool
    async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut S) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            // A panic mid-call leaves SQLite consistent; keep using the store
            let mut store = store.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut store)
        })
        .await?
    }
}

impl<S: RecordStore> std::fmt::Debug for DrawingVault<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingVault")
            .field("root", &self.config.root)
            .field("pending_saves", &self.pending_saves())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::Path;
    use crate::state::data::PathEntry;
    use tempfile::TempDir;

    fn vault() -> (TempDir, DrawingVault) {
        let dir = TempDir::new().unwrap();
        let vault = DrawingVault::open(StorageConfig::in_dir(dir.path())).unwrap();
        (dir, vault)
    }

    fn scribble(name: &str) -> Drawing {
        let mut path = Path::new();
        path.move_to(1.0, 1.0).line_to(4.0, 5.0);
        let mut drawing = Drawing::new(name, "tester");
        drawing.add_path(PathEntry::new(path, Color::BLACK, 3.0));
        drawing
    }

    #[tokio::test]
    async fn test_save_new_then_load() {
        let (_dir, vault) = vault();
        let id = vault.save(&scribble("A")).await.unwrap();
        assert_eq!(id, 0);

        let drawings = vault.load_all().await.unwrap();
        assert_eq!(drawings.len(), 1);
        assert_eq!(drawings[0].id, Some(0));
        assert_eq!(drawings[0].name, "A");
        assert_eq!(drawings[0].paths[0].size, 3.0);
        assert_eq!(vault.pending_saves(), 0);
    }

    #[tokio::test]
    async fn test_resave_updates_in_place() {
        let (_dir, vault) = vault();
        let mut drawing = scribble("A");
        drawing.id = Some(vault.save(&drawing).await.unwrap());

        drawing.name = "A2".into();
        drawing.paths.clear();
        let id = vault.save(&drawing).await.unwrap();
        assert_eq!(Some(id), drawing.id);

        let records = vault.records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "A2");
        let loaded = vault.load_all().await.unwrap();
        assert!(loaded[0].paths.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_is_saved_as_new() {
        let (_dir, vault) = vault();
        let mut drawing = scribble("A");
        drawing.id = Some(41);
        assert_eq!(vault.save(&drawing).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back_and_releases() {
        let (dir, vault) = vault();
        // A directory where the payload file should go makes the rename fail
        std::fs::create_dir_all(dir.path().join("drawings").join("drawing_0.json")).unwrap();

        let err = vault.save(&scribble("A")).await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(vault.records().await.unwrap().is_empty());
        assert_eq!(vault.pending_saves(), 0);

        // The guard is free again
        std::fs::remove_dir(dir.path().join("drawings").join("drawing_0.json")).unwrap();
        assert_eq!(vault.save(&scribble("A")).await.unwrap(), 1);
        assert_eq!(vault.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_verify_reports_missing_and_orphaned() {
        let (dir, vault) = vault();
        vault.save(&scribble("A")).await.unwrap();
        vault.save(&scribble("B")).await.unwrap();
        std::fs::remove_file(dir.path().join("drawings").join("drawing_0.json")).unwrap();
        std::fs::write(dir.path().join("drawings").join("stray.json"), "[]").unwrap();

        let report = vault.verify().await.unwrap();
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].id, 0);
        assert_eq!(report.orphaned, vec![dir.path().join("drawings").join("stray.json")]);
    }

    #[tokio::test]
    async fn test_closed_vault_refuses_work() {
        let (_dir, vault) = vault();
        vault.close();
        assert!(matches!(vault.save(&scribble("A")).await, Err(Error::GuardClosed)));
        assert!(matches!(vault.load_all().await, Err(Error::GuardClosed)));
        assert_eq!(vault.pending_saves(), 0);
    }
}
