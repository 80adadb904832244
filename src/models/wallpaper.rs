//! Wallpaper data structures.

use serde::{Deserialize, Deserializer, Serialize};

/// A wallpaper entry in the history store.
///
/// Field names match the persisted `bing.json` layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WallpaperRecord {
    /// Date key, e.g. `20240101`
    pub enddate: String,

    /// Full URL of the high-resolution image
    pub url: String,

    /// Copyright caption
    #[serde(default, deserialize_with = "null_as_empty")]
    pub copyright: String,

    /// Link to the detail page for the image
    #[serde(default, deserialize_with = "null_as_empty")]
    pub copyrightlink: String,
}

/// Read a JSON `null` as an empty string.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl WallpaperRecord {
    /// Year bucket used for the download directory.
    ///
    /// First four characters of `enddate`, or `unknown` for shorter keys.
    pub fn year(&self) -> String {
        if self.enddate.chars().count() >= 4 {
            self.enddate.chars().take(4).collect()
        } else {
            "unknown".to_string()
        }
    }

    /// Whether `enddate` is safe to embed in a file name.
    pub fn has_safe_key(&self) -> bool {
        !self.enddate.is_empty()
            && !self.enddate.contains(['/', '\\'])
            && !self.enddate.contains("..")
    }
}

/// Response body of the image archive endpoint.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ArchiveResponse {
    #[serde(default)]
    pub images: Vec<ArchiveImage>,
}

/// One image entry as returned by the archive endpoint.
///
/// Only the fields we keep are modelled; everything else is ignored.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ArchiveImage {
    #[serde(default)]
    pub urlbase: Option<String>,
    #[serde(default)]
    pub enddate: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub copyrightlink: Option<String>,
}

impl ArchiveImage {
    /// Convert into a record, or `None` when `urlbase` or `enddate` is missing or empty.
    pub fn into_record(self, image_host: &str, image_suffix: &str) -> Option<WallpaperRecord> {
        let urlbase = self.urlbase.filter(|s| !s.is_empty())?;
        let enddate = self.enddate.filter(|s| !s.is_empty())?;

        Some(WallpaperRecord {
            enddate,
            url: format!("{image_host}{urlbase}{image_suffix}"),
            copyright: self.copyright.unwrap_or_default(),
            copyrightlink: self.copyrightlink.unwrap_or_default(),
        })
    }
}
