//! Storage abstractions for wallpaper persistence.
//!
//! ## Directory Structure
//!
//! ```text
//! Bing_Wallpaper/
//! ├── bing.json                     # History store, ascending by enddate
//! ├── 2024/
//! │   ├── 20240101_zh-cn_UHD.jpg
//! │   └── 20240102_zh-cn_UHD.jpg
//! └── 2025/
//!     └── 20250101_zh-cn_UHD.jpg
//! ```

pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::WallpaperRecord;

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about a history write.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Number of records written
    pub record_count: usize,
    /// Where the history was written
    pub location: String,
    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}

/// Trait for wallpaper storage backends.
#[async_trait]
pub trait WallpaperStorage: Send + Sync {
    /// Load the history store.
    ///
    /// A missing or unreadable-as-JSON store yields an empty history. Individual
    /// entries that do not form a record are dropped, the rest are kept.
    async fn load_history(&self) -> Result<Vec<WallpaperRecord>>;

    /// Overwrite the history store with `records`.
    async fn save_history(&self, records: &[WallpaperRecord]) -> Result<WriteMetadata>;

    /// Target file for a record's image.
    fn image_path(&self, record: &WallpaperRecord) -> PathBuf;
}
