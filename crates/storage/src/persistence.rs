//! Versioned JSON file persistence
//!
//! Documents are wrapped in an envelope carrying a schema version and an md5
//! checksum of the payload. Loads verify both, so a truncated or hand-edited
//! file is reported as corruption rather than read back as wrong data.
//!
//! Payload types must serialize deterministically (use `BTreeMap`, not
//! `HashMap`) or the checksum will not survive a round trip.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Persistence error types
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Corruption detected
    #[error("Corruption detected: {0}")]
    Corruption(String),

    /// Version mismatch
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version
        expected: u32,
        /// Found version
        found: u32,
    },
}

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, PersistenceError>;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    checksum: String,
    data: T,
}

fn checksum<T: Serialize>(data: &T) -> Result<String> {
    let json = serde_json::to_string(data)?;
    Ok(format!("{:x}", md5::compute(json)))
}

/// File persistence configuration
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Path to the document
    pub path: PathBuf,
    /// Current schema version
    pub version: u32,
    /// Write through a temp file and rename
    pub atomic_writes: bool,
}

impl PersistenceConfig {
    /// Create a configuration for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            version: 1,
            atomic_writes: true,
        }
    }

    /// Set schema version
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Enable or disable atomic writes
    pub fn atomic_writes(mut self, enabled: bool) -> Self {
        self.atomic_writes = enabled;
        self
    }
}

/// A single JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonDocument<T> {
    config: PersistenceConfig,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a handle; nothing is read until [`JsonDocument::load`]
    pub fn new(config: PersistenceConfig) -> Self {
        Self { config, _marker: PhantomData }
    }

    /// Path of the document
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Load the document, or `None` if it has never been written
    pub async fn load(&self) -> Result<Option<T>> {
        let contents = match fs::read_to_string(&self.config.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let envelope: Envelope<T> = serde_json::from_str(&contents)?;

        if envelope.version != self.config.version {
            return Err(PersistenceError::VersionMismatch {
                expected: self.config.version,
                found: envelope.version,
            });
        }

        let computed = checksum(&envelope.data)?;
        if computed != envelope.checksum {
            return Err(PersistenceError::Corruption(format!(
                "Checksum mismatch in {}: expected {}, got {}",
                self.config.path.display(),
                envelope.checksum,
                computed
            )));
        }

        Ok(Some(envelope.data))
    }

    /// Write the document
    pub async fn save(&self, data: &T) -> Result<()> {
        let envelope = Envelope {
            version: self.config.version,
            checksum: checksum(data)?,
            data,
        };
        let json = serde_json::to_string_pretty(&envelope)?;

        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        if self.config.atomic_writes {
            self.write_atomic(&json).await
        } else {
            fs::write(&self.config.path, json).await?;
            Ok(())
        }
    }

    /// Delete the document if it exists
    pub async fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.config.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Move the document aside to `<file>.corrupt` and return the new path
    ///
    /// Any earlier quarantined copy is replaced.
    pub async fn quarantine(&self) -> Result<PathBuf> {
        let target = self.corrupt_path();
        fs::rename(&self.config.path, &target).await?;
        Ok(target)
    }

    fn corrupt_path(&self) -> PathBuf {
        let mut path = self.config.path.clone();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.set_file_name(format!("{}.corrupt", filename));
        path
    }

    /// Write atomically using temp file + rename
    async fn write_atomic(&self, contents: &str) -> Result<()> {
        let temp_path = self.config.path.with_extension("tmp");

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(contents.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &self.config.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
    struct Doc {
        entries: BTreeMap<String, String>,
    }

    fn sample() -> Doc {
        let mut entries = BTreeMap::new();
        entries.insert("primary".to_string(), "#6E56CF".to_string());
        entries.insert("background".to_string(), "#F9FAFB".to_string());
        Doc { entries }
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let doc: JsonDocument<Doc> = JsonDocument::new(PersistenceConfig::new(dir.path().join("missing.json")));
        assert_eq!(doc.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let doc: JsonDocument<Doc> = JsonDocument::new(PersistenceConfig::new(dir.path().join("doc.json")));

        doc.save(&sample()).await.unwrap();
        assert_eq!(doc.load().await.unwrap(), Some(sample()));
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("doc.json");
        let doc: JsonDocument<Doc> = JsonDocument::new(PersistenceConfig::new(&path));

        doc.save(&sample()).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_atomic_write_cleans_temp_file() {
        let dir = TempDir::new().unwrap();
        let config = PersistenceConfig::new(dir.path().join("atomic.json")).atomic_writes(true);
        let doc: JsonDocument<Doc> = JsonDocument::new(config.clone());

        doc.save(&sample()).await.unwrap();
        assert!(!config.path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_non_atomic_write() {
        let dir = TempDir::new().unwrap();
        let config = PersistenceConfig::new(dir.path().join("plain.json")).atomic_writes(false);
        let doc: JsonDocument<Doc> = JsonDocument::new(config);

        doc.save(&sample()).await.unwrap();
        assert_eq!(doc.load().await.unwrap(), Some(sample()));
    }

    #[tokio::test]
    async fn test_corruption_detection() {
        let dir = TempDir::new().unwrap();
        let config = PersistenceConfig::new(dir.path().join("corrupt.json"));
        let doc: JsonDocument<Doc> = JsonDocument::new(config.clone());
        doc.save(&sample()).await.unwrap();

        let contents = fs::read_to_string(&config.path).await.unwrap();
        fs::write(&config.path, contents.replace("#6E56CF", "#FF0000")).await.unwrap();

        let result = doc.load().await;
        assert!(matches!(result, Err(PersistenceError::Corruption(_))));
    }

    #[tokio::test]
    async fn test_version_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("versioned.json");

        let v1: JsonDocument<Doc> = JsonDocument::new(PersistenceConfig::new(&path));
        v1.save(&sample()).await.unwrap();

        let v2: JsonDocument<Doc> = JsonDocument::new(PersistenceConfig::new(&path).version(2));
        let result = v2.load().await;
        assert!(matches!(
            result,
            Err(PersistenceError::VersionMismatch { expected: 2, found: 1 })
        ));
    }

    #[tokio::test]
    async fn test_unparseable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.json");
        fs::write(&path, "{ not json").await.unwrap();

        let doc: JsonDocument<Doc> = JsonDocument::new(PersistenceConfig::new(&path));
        assert!(matches!(doc.load().await, Err(PersistenceError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_quarantine_moves_file_aside() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        let doc: JsonDocument<Doc> = JsonDocument::new(PersistenceConfig::new(&path));
        doc.save(&sample()).await.unwrap();

        let moved = doc.quarantine().await.unwrap();
        assert_eq!(moved, dir.path().join("doc.json.corrupt"));
        assert!(moved.exists());
        assert!(!path.exists());
        assert_eq!(doc.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = TempDir::new().unwrap();
        let doc: JsonDocument<Doc> = JsonDocument::new(PersistenceConfig::new(dir.path().join("gone.json")));

        doc.save(&sample()).await.unwrap();
        doc.remove().await.unwrap();
        assert!(!doc.path().exists());
        // Removing twice is fine
        doc.remove().await.unwrap();
    }
}
