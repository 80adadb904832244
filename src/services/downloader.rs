// src/services/downloader.rs

//! Image downloader service.
//!
//! Each image lands at the path chosen by the storage backend. Bodies are
//! streamed into a `.part` sibling and renamed into place once complete, so a
//! file at the final path is always a finished download.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, WallpaperRecord};
use crate::storage::WallpaperStorage;
use crate::utils::HttpGateway;

/// Result of trying to materialize one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Fetched during this run
    Downloaded { path: PathBuf, bytes: u64 },
    /// Already on disk, nothing fetched
    Skipped { path: PathBuf },
    /// Network or I/O failure
    Failed { reason: String },
}

impl DownloadOutcome {
    /// Whether this run produced the file.
    pub fn is_new(&self) -> bool {
        matches!(self, Self::Downloaded { .. })
    }
}

/// Summary of a download pass.
#[derive(Debug, Default)]
pub struct DownloadReport {
    /// Records whose image was fetched during this run
    pub downloaded: Vec<WallpaperRecord>,
    pub skipped: usize,
    pub failed: usize,
}

/// Service for downloading wallpaper images.
pub struct ImageDownloader {
    config: Arc<Config>,
    gateway: Arc<dyn HttpGateway>,
}

impl ImageDownloader {
    pub fn new(config: Arc<Config>, gateway: Arc<dyn HttpGateway>) -> Self {
        Self { config, gateway }
    }

    /// Download every record's image that is not yet on disk.
    pub async fn download_all(
        &self,
        storage: &dyn WallpaperStorage,
        records: &[WallpaperRecord],
    ) -> DownloadReport {
        let mut report = DownloadReport::default();

        for record in records {
            match self.download(storage, record).await {
                DownloadOutcome::Downloaded { .. } => report.downloaded.push(record.clone()),
                DownloadOutcome::Skipped { .. } => report.skipped += 1,
                DownloadOutcome::Failed { .. } => report.failed += 1,
            }
        }

        report
    }

    /// Download one record's image unless it already exists.
    pub async fn download(
        &self,
        storage: &dyn WallpaperStorage,
        record: &WallpaperRecord,
    ) -> DownloadOutcome {
        if !record.has_safe_key() {
            log::warn!("Skipping record with unusable enddate {:?}", record.enddate);
            return DownloadOutcome::Failed {
                reason: format!("unusable enddate {:?}", record.enddate),
            };
        }

        let path = storage.image_path(record);
        match self.fetch_into(&record.url, &path).await {
            Ok(Some(bytes)) => {
                log::info!("Downloaded {} ({} bytes)", path.display(), bytes);
                DownloadOutcome::Downloaded { path, bytes }
            }
            Ok(None) => {
                log::info!("{} already exists, skipping", path.display());
                DownloadOutcome::Skipped { path }
            }
            Err(error) => {
                log::warn!("Failed to download {} -> {}: {}", record.url, path.display(), error);
                DownloadOutcome::Failed {
                    reason: error.to_string(),
                }
            }
        }
    }

    /// Fetch `url` into `path`; `Ok(None)` when the file is already there.
    async fn fetch_into(&self, url: &str, path: &Path) -> Result<Option<u64>> {
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        if tokio::fs::try_exists(path).await? {
            return Ok(None);
        }

        log::info!("Downloading {} -> {}", url, path.display());
        let part = part_path(path);
        let timeout = self.config.downloader.timeout();

        let written = match self.gateway.download_to(url, &part, timeout).await {
            Ok(written) => written,
            Err(error) => {
                let _ = tokio::fs::remove_file(&part).await;
                return Err(error);
            }
        };

        tokio::fs::rename(&part, path).await?;
        Ok(Some(written))
    }
}

/// In-progress sibling of `path`.
fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::storage::LocalStorage;
    use crate::utils::http::mock::MockGateway;

    fn record(enddate: &str) -> WallpaperRecord {
        WallpaperRecord {
            enddate: enddate.to_string(),
            url: format!("https://img.test/{enddate}.jpg"),
            copyright: "c".to_string(),
            copyrightlink: "https://x/link".to_string(),
        }
    }

    fn downloader(gateway: &Arc<MockGateway>) -> ImageDownloader {
        ImageDownloader::new(Arc::new(Config::default()), gateway.clone())
    }

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Path::new("a/2024/20240101_zh-cn_UHD.jpg")),
            PathBuf::from("a/2024/20240101_zh-cn_UHD.jpg.part")
        );
    }

    #[tokio::test]
    async fn test_downloads_missing_image() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let gateway = Arc::new(MockGateway::new().with_image("https://img.test/20240101.jpg", b"jpeg"));

        let outcome = downloader(&gateway).download(&storage, &record("20240101")).await;

        let expected = tmp.path().join("2024").join("20240101_zh-cn_UHD.jpg");
        assert_eq!(
            outcome,
            DownloadOutcome::Downloaded {
                path: expected.clone(),
                bytes: 4
            }
        );
        assert_eq!(std::fs::read(&expected).unwrap(), b"jpeg");
        assert!(!part_path(&expected).exists());
    }

    #[tokio::test]
    async fn test_existing_file_skips_network() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let rec = record("20240101");
        let path = storage.image_path(&rec);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"old").unwrap();

        let gateway = Arc::new(MockGateway::new().with_image(&rec.url, b"new"));
        let outcome = downloader(&gateway).download(&storage, &rec).await;

        assert!(!outcome.is_new());
        assert_eq!(outcome, DownloadOutcome::Skipped { path: path.clone() });
        assert_eq!(gateway.downloads(), 0);
        assert_eq!(std::fs::read(&path).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_failure_leaves_no_file() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let gateway = Arc::new(MockGateway::new());
        let rec = record("20240101");

        let outcome = downloader(&gateway).download(&storage, &rec).await;

        assert!(matches!(outcome, DownloadOutcome::Failed { .. }));
        let path = storage.image_path(&rec);
        assert!(!path.exists());
        assert!(!part_path(&path).exists());
        assert!(path.parent().unwrap().is_dir());
    }

    #[tokio::test]
    async fn test_short_enddate_uses_unknown_bucket() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let gateway = Arc::new(MockGateway::new().with_image("https://img.test/123.jpg", b"x"));

        let outcome = downloader(&gateway).download(&storage, &record("123")).await;

        assert!(outcome.is_new());
        assert!(tmp.path().join("unknown").join("123_zh-cn_UHD.jpg").exists());
    }

    #[tokio::test]
    async fn test_download_all_reports_only_new() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let existing = record("20240101");
        let path = storage.image_path(&existing);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"old").unwrap();

        let gateway = Arc::new(MockGateway::new().with_image("https://img.test/20240102.jpg", b"new"));
        let records = vec![existing, record("20240102"), record("20240103")];

        let report = downloader(&gateway).download_all(&storage, &records).await;

        assert_eq!(report.downloaded, vec![record("20240102")]);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
    }
}
