//! File-backed catalogue storage.
//!
//! [`CatalogueFileStore`] keeps every catalogue it reads or writes in a
//! per-store cache keyed by the normalised file path, and only fills it after
//! a successful parse or write. Placeholders are created with `create_new`, so
//! concurrent creators never clobber each other. Rewrites take an exclusive
//! advisory lock on the one file for the truncate, write, and flush, and
//! release it before the cache is updated.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use fs2::FileExt;
use log::debug;

use super::{Catalogue, decode, encode};
use crate::error::CatalogueError;
use crate::paths::{CataloguePaths, normalise_path};

const TARGET: &str = "lexis::store";

/// Whether [`CatalogueFileStore::ensure_file`] had to create the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The placeholder catalogue was written.
    Created,
    /// A catalogue file was already present and left untouched.
    AlreadyPresent,
}

/// Reads and writes catalogue files, caching every catalogue it loads.
///
/// The cache is keyed by the normalised file path and is owned by the store,
/// so independent stores (for example one per test) never observe each
/// other. Entries are never invalidated by writes from other processes; a
/// long-lived store keeps serving, and rewriting, the mapping it loaded.
#[derive(Debug)]
pub struct CatalogueFileStore {
    paths: CataloguePaths,
    cache: Mutex<HashMap<Utf8PathBuf, Arc<Catalogue>>>,
}

impl CatalogueFileStore {
    /// Store using `paths` to name catalogue files.
    #[must_use]
    pub fn new(paths: CataloguePaths) -> Self {
        Self {
            paths,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Layout used to compute file names.
    #[must_use]
    pub const fn paths(&self) -> &CataloguePaths {
        &self.paths
    }

    /// Normalised file path for (`language`, `category`) under `base`.
    #[must_use]
    pub fn file_path(&self, language: &str, category: &str, base: &Utf8Path) -> Utf8PathBuf {
        normalise_path(&self.paths.file_in(base, language, category))
    }

    /// Load the catalogue, serving it from the cache after the first read.
    ///
    /// Returns `Ok(None)` when the file does not exist; nothing is created.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Io`] when the file exists but cannot be read
    /// and [`CatalogueError::Parse`] when it is not a message mapping. Failed
    /// parses are not cached, so a repaired file is picked up on the next
    /// call.
    pub fn load(
        &self,
        language: &str,
        category: &str,
        base: &Utf8Path,
    ) -> Result<Option<Arc<Catalogue>>, CatalogueError> {
        let path = self.file_path(language, category, base);
        if let Some(cached) = self.lock_cache().get(&path) {
            return Ok(Some(Arc::clone(cached)));
        }

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(CatalogueError::io(path, error)),
        };

        let catalogue = decode(&text).map_err(|error| CatalogueError::Parse {
            path: path.clone(),
            reason: error.to_string(),
        })?;

        debug!(target: TARGET, "loaded {} entries from {path}", catalogue.len());
        let shared = Arc::new(catalogue);
        self.lock_cache().insert(path, Arc::clone(&shared));
        Ok(Some(shared))
    }

    /// Cached catalogue for the file, without touching the filesystem.
    #[must_use]
    pub fn cached(
        &self,
        language: &str,
        category: &str,
        base: &Utf8Path,
    ) -> Option<Arc<Catalogue>> {
        let path = self.file_path(language, category, base);
        self.lock_cache().get(&path).cloned()
    }

    /// Create the directory tree and a placeholder catalogue when absent.
    ///
    /// Existing directories and files are left alone, so the call is
    /// idempotent and safe to race against other processes.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Io`] when a directory or the file cannot be
    /// created for any reason other than already existing.
    pub fn ensure_file(
        &self,
        language: &str,
        category: &str,
        base: &Utf8Path,
    ) -> Result<EnsureOutcome, CatalogueError> {
        let path = self.file_path(language, category, base);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| CatalogueError::io(parent, error))?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                return Ok(EnsureOutcome::AlreadyPresent);
            }
            Err(error) => return Err(CatalogueError::io(path, error)),
        };

        let placeholder = Catalogue::sentinel();
        let text = encode(&placeholder).map_err(|error| CatalogueError::Encode {
            path: path.clone(),
            reason: error.to_string(),
        })?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|error| CatalogueError::io(path.clone(), error))?;

        debug!(target: TARGET, "created placeholder catalogue {path}");
        self.lock_cache().insert(path, Arc::new(placeholder));
        Ok(EnsureOutcome::Created)
    }

    /// Rewrite the whole file with `catalogue` under an exclusive lock.
    ///
    /// The lock covers only this file and only the truncate, write, and flush.
    /// Whatever another process wrote since this store loaded the file is
    /// replaced: the last writer wins.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Io`] when the file cannot be opened, locked,
    /// or written, and [`CatalogueError::Encode`] when serialisation fails.
    /// The cache is only updated after a successful write.
    pub fn persist(
        &self,
        language: &str,
        category: &str,
        base: &Utf8Path,
        catalogue: &Catalogue,
    ) -> Result<(), CatalogueError> {
        let path = self.file_path(language, category, base);
        let text = encode(catalogue).map_err(|error| CatalogueError::Encode {
            path: path.clone(),
            reason: error.to_string(),
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| CatalogueError::io(parent, error))?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|error| CatalogueError::io(path.clone(), error))?;

        FileExt::lock_exclusive(&file).map_err(|error| CatalogueError::io(path.clone(), error))?;
        let written = rewrite(&mut file, text.as_bytes());
        let unlocked = FileExt::unlock(&file);
        written
            .and(unlocked)
            .map_err(|error| CatalogueError::io(path.clone(), error))?;

        debug!(target: TARGET, "persisted {} entries to {path}", catalogue.len());
        self.lock_cache().insert(path, Arc::new(catalogue.clone()));
        Ok(())
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<Utf8PathBuf, Arc<Catalogue>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn rewrite(file: &mut File, bytes: &[u8]) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(bytes)?;
    file.flush()?;
    file.sync_data()
}
