/*!
 * Durable filesystem store
 *
 * One JSON file per record. The current key lives at
 * `{prefix}current.key`; saving over it first copies the old file to
 * `{prefix}old-{date}-{uuid}.key`, so history accumulates as dated
 * archive files. Every read and write uses a scoped handle, which means
 * no lingering lock survives into the next operation.
 */

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{KeyError, KeyResult};
use crate::record::KeyRecord;
use crate::store::KeyStore;

/// Extension shared by the current file and the archives
const RECORD_EXTENSION: &str = "key";

/// Key store with one file per record under a directory
pub struct FileSystemStore {
    directory: PathBuf,
    prefix: String,
    // serializes the copy-then-overwrite of save against other operations
    lock: Mutex<()>,
}

impl FileSystemStore {
    /// Create a store over `directory`, naming its files with `prefix`
    ///
    /// The directory is created on the first save, not here.
    pub fn new<P: AsRef<Path>>(directory: P, prefix: &str) -> Self {
        FileSystemStore {
            directory: directory.as_ref().to_path_buf(),
            prefix: prefix.to_string(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the current key file
    pub fn current_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}current.key", self.prefix))
    }

    fn archive_path(&self) -> PathBuf {
        self.directory.join(format!(
            "{}old-{}-{}.key",
            self.prefix,
            Utc::now().format("%Y-%m-%d"),
            Uuid::new_v4()
        ))
    }

    fn read_record(path: &Path) -> KeyResult<KeyRecord> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl KeyStore for FileSystemStore {
    fn save(&self, record: &KeyRecord) -> KeyResult<()> {
        let _guard = self.lock.lock().unwrap();

        fs::create_dir_all(&self.directory)?;
        let current_path = self.current_path();
        if current_path.exists() {
            let archive = self.archive_path();
            fs::copy(&current_path, &archive)?;
            log::info!(
                "Archived previous signing key to {}",
                archive.display()
            );
        }

        let serialized = serde_json::to_string_pretty(record)?;
        let mut file = File::create(&current_path)?;
        file.write_all(serialized.as_bytes())?;
        log::info!(
            "Saved signing key {} as current under {}",
            record.key_id,
            self.directory.display()
        );
        Ok(())
    }

    fn current(&self) -> KeyResult<KeyRecord> {
        let _guard = self.lock.lock().unwrap();

        let path = self.current_path();
        if !path.exists() {
            return Err(KeyError::not_found(&format!(
                "current key in {}",
                self.directory.display()
            )));
        }
        Self::read_record(&path)
    }

    fn recent(&self, quantity: usize) -> KeyResult<Vec<KeyRecord>> {
        let _guard = self.lock.lock().unwrap();

        if !self.directory.exists() {
            return Ok(Vec::new());
        }
        let current_path = self.current_path();
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let record = Self::read_record(&path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            entries.push((record, path == current_path, name));
        }

        // Newest first by the record's own creation date; the current key
        // wins ties, then reverse file name order keeps the result stable
        entries.sort_by(|a, b| {
            b.0.creation_date
                .cmp(&a.0.creation_date)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| b.2.cmp(&a.2))
        });
        entries.truncate(quantity);
        Ok(entries.into_iter().map(|(record, _, _)| record).collect())
    }

    fn clear(&self) -> KeyResult<()> {
        let _guard = self.lock.lock().unwrap();

        if !self.directory.exists() {
            return Ok(());
        }
        let mut removed = 0usize;
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        log::info!(
            "Cleared {} key records from {}",
            removed,
            self.directory.display()
        );
        Ok(())
    }
}
