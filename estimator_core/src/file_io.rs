//! # File I/O Module
//!
//! Shared file plumbing for settings files, exported reports, and the
//! product image cache:
//! - **Atomic writes**: Write to a temp file, fsync, rename
//! - **Versioned JSON**: Settings files carry a schema version checked on load
//! - **File locking**: Keep two writers off the same cache entry at once
//!
//! Estimates themselves are never persisted here.
//!
//! ## Example
//!
//! ```rust,no_run
//! use estimator_core::file_io::{load_versioned, save_versioned};
//! use estimator_core::session::EstimatorSettings;
//! use std::path::Path;
//!
//! let path = Path::new("estimator.json");
//! save_versioned(&EstimatorSettings::default(), path).unwrap();
//! let settings: EstimatorSettings = load_versioned(path).unwrap();
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use semver::Version;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::session::SCHEMA_VERSION;

/// Exclusive advisory lock guarding writes to one file.
///
/// The lock lives on a sibling `<file>.lock` and is held until the guard is
/// dropped. The OS releases it when the holder exits, so an entry abandoned
/// by a crashed writer is writable again immediately. The `.lock` file itself
/// stays on disk; removing it would let two writers lock different inodes.
pub struct FileLock {
    _lock_file: File,
}

impl FileLock {
    /// Take the lock without blocking.
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired
    /// * `Err(EstimateError::FileLocked)` - Another writer holds it right now
    pub fn acquire(path: &Path) -> EstimateResult<Self> {
        let lock_path = lock_path_for(path);

        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                EstimateError::file_error("open lock", lock_path.display().to_string(), e.to_string())
            })?;

        FileExt::try_lock_exclusive(&lock_file)
            .map_err(|_| EstimateError::file_locked(path.display().to_string()))?;

        Ok(FileLock {
            _lock_file: lock_file,
        })
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut lock_path = path.as_os_str().to_owned();
    lock_path.push(".lock");
    PathBuf::from(lock_path)
}

/// Read a whole file as UTF-8
pub fn read_to_string(path: &Path) -> EstimateResult<String> {
    let mut file = File::open(path)
        .map_err(|e| EstimateError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| EstimateError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Write bytes with atomic replace semantics.
///
/// 1. Write to `<path>.tmp`
/// 2. Sync to disk (fsync)
/// 3. Rename over `path`
pub fn write_atomic(path: &Path, bytes: &[u8]) -> EstimateResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        EstimateError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        EstimateError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        EstimateError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        EstimateError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Serialize to pretty JSON and write atomically
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> EstimateResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomic(path, json.as_bytes())
}

/// Read and parse a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> EstimateResult<T> {
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| EstimateError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// On-disk wrapper adding a schema version to any settings body.
///
/// ```json
/// { "version": "0.1.0", "deck": { ... }, "fence": { ... } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedFile<T> {
    pub version: String,
    #[serde(flatten)]
    pub body: T,
}

/// Save a settings body stamped with the current schema version
pub fn save_versioned<T: Serialize>(body: &T, path: &Path) -> EstimateResult<()> {
    let file = VersionedFile {
        version: SCHEMA_VERSION.to_string(),
        body,
    };
    save_json(&file, path)
}

/// Load a settings body, rejecting incompatible schema versions
pub fn load_versioned<T: DeserializeOwned>(path: &Path) -> EstimateResult<T> {
    let file: VersionedFile<T> = load_json(path)?;
    validate_version(&file.version)?;
    Ok(file.body)
}

/// Check a file's schema version against [`SCHEMA_VERSION`].
///
/// Major versions must match. While the schema is 0.x, a file with a newer
/// minor version is rejected too.
pub fn validate_version(file_version: &str) -> EstimateResult<()> {
    let mismatch = || EstimateError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file = Version::parse(file_version).map_err(|_| mismatch())?;
    let current = Version::parse(SCHEMA_VERSION).map_err(|e| EstimateError::Internal {
        message: format!("Bad SCHEMA_VERSION: {}", e),
    })?;

    if file.major != current.major {
        return Err(mismatch());
    }
    if current.major == 0 && file.minor > current.minor {
        return Err(mismatch());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EstimatorSettings;

    #[test]
    fn test_lock_path_generation() {
        let lock_path = lock_path_for(Path::new("/cache/product_img_v2_deck.json"));
        assert_eq!(lock_path, Path::new("/cache/product_img_v2_deck.json.lock"));
    }

    #[test]
    fn test_versioned_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estimator.json");

        let mut settings = EstimatorSettings::default();
        settings.deck.width_ft = 16.0;
        save_versioned(&settings, &path).unwrap();

        let raw = read_to_string(&path).unwrap();
        assert!(raw.contains(SCHEMA_VERSION));

        let loaded: EstimatorSettings = load_versioned(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_atomic_write_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        write_atomic(&path, b"%PDF-1.7").unwrap();
        assert!(path.exists());
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_json::<EstimatorSettings>(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = read_to_string(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_file_lock_is_exclusive_until_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.json");

        let lock = FileLock::acquire(&path).unwrap();
        assert!(lock_path_for(&path).exists());

        let err = FileLock::acquire(&path).err().unwrap();
        assert_eq!(err.error_code(), "FILE_LOCKED");

        drop(lock);
        assert!(FileLock::acquire(&path).is_ok());
    }

    #[test]
    fn test_leftover_lock_file_does_not_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.json");

        // What a writer killed mid-save leaves behind
        fs::write(lock_path_for(&path), "").unwrap();
        assert!(FileLock::acquire(&path).is_ok());
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("not-a-version").is_err());
    }
}
