// src/models/mod.rs

//! Domain models for the archiver.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod quote;
mod wallpaper;

// Re-export all public types
pub use config::{
    Config, DownloaderConfig, FetcherConfig, NotifierConfig, PathsConfig, WEBHOOK_ENV,
};
pub use quote::{HitokotoResponse, PLACEHOLDER_SOURCE, PLACEHOLDER_TEXT, Quote};
pub use wallpaper::{ArchiveImage, ArchiveResponse, WallpaperRecord};
