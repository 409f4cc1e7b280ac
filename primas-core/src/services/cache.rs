//! Cache manager - lifecycle of the normalized dataset
//!
//! Owns the two snapshot tiers: the in-process `Arc<CacheSnapshot>` and the
//! persisted JSON copy. Staleness is detected by comparing the source file's
//! modification time against the persisted snapshot's. Readers always see
//! either the previous snapshot or a fully-built new one; a rebuild swaps a
//! single `Arc`, never mutates in place.
//!
//! Persistence uses write-to-temp plus atomic rename, under an exclusive
//! file lock, so a concurrent process never observes a half-written
//! snapshot. The source file itself has no locking protocol with its
//! external writer; a rebuild racing an external write is detected on the
//! next modification-time comparison.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use fs2::FileExt;
use tracing::{info, warn};

use crate::domain::result::{Error, Result};
use crate::domain::CacheSnapshot;
use crate::ports::ReportSource;
use crate::regional::RegionalMap;
use crate::services::ingest::IngestService;

pub struct CacheManager {
    source: Arc<dyn ReportSource>,
    ingest: IngestService,
    snapshot_path: PathBuf,
    regional_map_path: PathBuf,
    memory: RwLock<Option<Arc<CacheSnapshot>>>,
    /// Single rebuild in flight per process
    build_lock: Mutex<()>,
    rebuilds: AtomicUsize,
}

impl CacheManager {
    pub fn new(
        source: Arc<dyn ReportSource>,
        snapshot_path: impl Into<PathBuf>,
        regional_map_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ingest: IngestService::new(source.clone()),
            source,
            snapshot_path: snapshot_path.into(),
            regional_map_path: regional_map_path.into(),
            memory: RwLock::new(None),
            build_lock: Mutex::new(()),
            rebuilds: AtomicUsize::new(0),
        }
    }

    /// Load the current snapshot.
    ///
    /// Memory hit returns without any I/O. Otherwise: no disk snapshot means
    /// rebuild; a disk snapshot older than the source means rebuild; a fresh
    /// disk snapshot is read back (falling back to a rebuild when corrupt).
    pub fn load(&self) -> Result<Arc<CacheSnapshot>> {
        if let Some(snap) = self.memory.read().unwrap().clone() {
            return Ok(snap);
        }

        let _guard = self.build_lock.lock().unwrap();
        // someone else may have finished loading while we waited
        if let Some(snap) = self.memory.read().unwrap().clone() {
            return Ok(snap);
        }

        if !self.snapshot_path.exists() {
            info!("no persisted snapshot, building from source");
            return self.rebuild();
        }

        if self.disk_is_stale() {
            info!("source newer than persisted snapshot, rebuilding");
            return self.rebuild();
        }

        match self.read_disk() {
            Ok(snapshot) => {
                info!(
                    registros = snapshot.total_registros,
                    timestamp = %snapshot.timestamp,
                    "loaded persisted snapshot"
                );
                let snap = Arc::new(snapshot);
                *self.memory.write().unwrap() = Some(snap.clone());
                Ok(snap)
            }
            Err(e) => {
                warn!(error = %e, "persisted snapshot unreadable, rebuilding");
                self.rebuild()
            }
        }
    }

    /// Drop the in-memory snapshot. The persisted copy stays on disk.
    pub fn invalidate(&self) {
        *self.memory.write().unwrap() = None;
        info!("in-memory snapshot invalidated");
    }

    /// Rebuild from source unconditionally, ignoring disk staleness.
    ///
    /// On failure the previous snapshot — memory and disk — stays in place.
    pub fn force_refresh(&self) -> Result<Arc<CacheSnapshot>> {
        let _guard = self.build_lock.lock().unwrap();
        self.rebuild()
    }

    /// How many ingestion rebuilds this manager has run.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds.load(Ordering::SeqCst)
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Runs the pipeline and swaps both tiers. Caller must hold `build_lock`.
    fn rebuild(&self) -> Result<Arc<CacheSnapshot>> {
        self.rebuilds.fetch_add(1, Ordering::SeqCst);

        // re-read so edits to the override table land on the next rebuild
        let regional_map = RegionalMap::load(&self.regional_map_path);

        let snapshot = self.ingest.build_snapshot(&regional_map)?;
        self.persist(&snapshot)?;

        let snap = Arc::new(snapshot);
        *self.memory.write().unwrap() = Some(snap.clone());
        Ok(snap)
    }

    /// Source strictly newer than the persisted snapshot?
    ///
    /// An unreadable source mtime is treated as not-stale: with the source
    /// gone, the persisted snapshot is the only data left and must stay
    /// servable. An unreadable snapshot mtime forces a rebuild.
    fn disk_is_stale(&self) -> bool {
        let source_mtime = match self.source.modified_at() {
            Ok(t) => t,
            Err(_) => return false,
        };
        let snapshot_mtime = match fs::metadata(&self.snapshot_path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => return true,
        };
        source_mtime > snapshot_mtime
    }

    fn read_disk(&self) -> Result<CacheSnapshot> {
        let content = fs::read_to_string(&self.snapshot_path)
            .map_err(|e| Error::snapshot_corrupt(format!("{}: {}", self.snapshot_path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::snapshot_corrupt(format!("{}: {}", self.snapshot_path.display(), e)))
    }

    /// Write-to-temp + atomic rename under an exclusive lock, so concurrent
    /// readers and processes never see a partial snapshot file.
    fn persist(&self, snapshot: &CacheSnapshot) -> Result<()> {
        if let Some(parent) = self.snapshot_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_path = self.snapshot_path.with_extension("lock");
        let lock_file = File::create(&lock_path)?;
        lock_file.lock_exclusive()?;

        let tmp_path = self.snapshot_path.with_extension("json.tmp");
        let result = serde_json::to_string(snapshot)
            .map_err(Error::Json)
            .and_then(|json| fs::write(&tmp_path, json).map_err(Error::Io))
            .and_then(|_| fs::rename(&tmp_path, &self.snapshot_path).map_err(Error::Io));

        let _ = FileExt::unlock(&lock_file);
        result?;

        info!(path = %self.snapshot_path.display(), "snapshot persisted");
        Ok(())
    }
}
