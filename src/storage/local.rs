//! Local filesystem storage implementation.
//!
//! The history is rewritten in full on every save, through a temp file that is
//! renamed over the old one. Indentation is four spaces and non-ASCII text is
//! written as-is.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{Config, WallpaperRecord};
use crate::storage::{WallpaperStorage, WriteMetadata};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    history_file: String,
    locale_suffix: String,
    resolution_tag: String,
}

impl LocalStorage {
    /// Create a LocalStorage rooted at the given directory with default naming.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self::from_config(root_dir, &Config::default())
    }

    /// Create a LocalStorage using the file names from `config`.
    pub fn from_config(root_dir: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            root_dir: root_dir.into(),
            history_file: config.paths.history_file.clone(),
            locale_suffix: config.downloader.locale_suffix.clone(),
            resolution_tag: config.downloader.resolution_tag.clone(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Full path of the history store.
    pub fn history_path(&self) -> PathBuf {
        self.root_dir.join(&self.history_file)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

/// Serialize `value` as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

#[async_trait]
impl WallpaperStorage for LocalStorage {
    async fn load_history(&self) -> Result<Vec<WallpaperRecord>> {
        let path = self.history_path();
        let Some(bytes) = self.read_bytes(&path).await? else {
            log::info!("No history found at {}, starting empty", path.display());
            return Ok(Vec::new());
        };

        let entries: Vec<Value> = match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!(
                    "History at {} is corrupt ({}), it will be rewritten",
                    path.display(),
                    e
                );
                return Ok(Vec::new());
            }
        };

        let total = entries.len();
        let records: Vec<WallpaperRecord> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<WallpaperRecord>(entry) {
                Ok(record) if !record.enddate.is_empty() && !record.url.is_empty() => Some(record),
                Ok(record) => {
                    log::warn!("Dropping history entry without enddate or url: {:?}", record);
                    None
                }
                Err(e) => {
                    log::warn!("Dropping unreadable history entry: {}", e);
                    None
                }
            })
            .collect();

        if records.len() < total {
            log::warn!(
                "Kept {} of {} history entries from {}",
                records.len(),
                total,
                path.display()
            );
        }
        Ok(records)
    }

    async fn save_history(&self, records: &[WallpaperRecord]) -> Result<WriteMetadata> {
        let path = self.history_path();
        let bytes = to_pretty_json(records)?;
        self.write_bytes(&path, &bytes).await?;

        Ok(WriteMetadata {
            record_count: records.len(),
            location: path.display().to_string(),
            timestamp: Utc::now(),
        })
    }

    fn image_path(&self, record: &WallpaperRecord) -> PathBuf {
        self.root_dir.join(record.year()).join(format!(
            "{}_{}_{}.jpg",
            record.enddate, self.locale_suffix, self.resolution_tag
        ))
    }
}
