//! Script storage for Meteorz.
//!
//! Scripts live in one flat directory, one file per stored name. The
//! directory listing is the only index:
//! ```text
//! {base_path}/
//! ├── hello.txt
//! ├── radar.lua
//! └── .upload-<uuid>   (in-progress upload, never listed)
//! ```
//!
//! Writes go to a temporary file in the same directory and are renamed into
//! place, so a stored name always refers to a complete file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::name::{validate_name, TEMP_PREFIX};
use crate::{MeteorzError, Result};

/// A script that has been written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredScript {
    /// Stored name (the original filename).
    pub name: String,
    /// Location inside the storage directory.
    pub path: PathBuf,
}

/// Flat on-disk store of uploaded scripts.
#[derive(Debug, Clone)]
pub struct ScriptStorage {
    /// Storage directory.
    base_path: PathBuf,
}

impl ScriptStorage {
    /// Open the storage directory, creating it if it does not exist.
    ///
    /// Only the final path segment is created; a missing parent is an error.
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();

        match fs::metadata(&base_path) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(MeteorzError::Config(format!(
                    "storage path {} is not a directory",
                    base_path.display()
                )));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir(&base_path)?;
                tracing::info!("Created storage directory: {}", base_path.display());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self { base_path })
    }

    /// Get the storage directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Store `content` under `name`, replacing any existing script of that name.
    pub fn save(&self, name: &str, content: &[u8]) -> Result<StoredScript> {
        validate_name(name)?;

        let path = self.base_path.join(name);
        let temp_path = self
            .base_path
            .join(format!("{TEMP_PREFIX}{}", Uuid::new_v4().simple()));

        let written = Self::write_synced(&temp_path, content)
            .and_then(|()| fs::rename(&temp_path, &path));

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(
                        "Failed to remove temporary upload {}: {}",
                        temp_path.display(),
                        cleanup
                    );
                }
            }
            return Err(e.into());
        }

        Ok(StoredScript {
            name: name.to_string(),
            path,
        })
    }

    fn write_synced(path: &Path, content: &[u8]) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(content)?;
        file.sync_all()
    }

    /// List stored names in lexicographic order.
    ///
    /// Only regular files are listed. Hidden entries, which include
    /// in-progress uploads, are skipped.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let Ok(name) = entry.file_name().into_string() else {
                tracing::debug!("Skipping non UTF-8 entry: {:?}", entry.file_name());
                continue;
            };
            if name.starts_with('.') {
                continue;
            }

            names.push(name);
        }

        names.sort();
        Ok(names)
    }

    /// Resolve a stored name to the path of an existing script.
    ///
    /// Returns `InvalidName` for names that fail validation and `NotFound`
    /// when no regular file with that name exists. Symlinks are not
    /// followed, matching `list`.
    pub fn locate(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;

        let path = self.base_path.join(name);
        match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(MeteorzError::NotFound(format!("Script: {name}"))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(MeteorzError::NotFound(format!("Script: {name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a script exists in storage.
    pub fn exists(&self, name: &str) -> bool {
        self.locate(name).is_ok()
    }
}
