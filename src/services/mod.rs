//! Service layer for the archiver.
//!
//! This module contains the business logic for:
//! - Archive fetching (`ArchiveFetcher`)
//! - Image downloading (`ImageDownloader`)
//! - Quote of the day (`QuoteClient`)
//! - Webhook notification (`Notifier`)

mod archive;
mod downloader;
mod notifier;
mod quote;

pub use archive::{ArchiveFetcher, EndpointFailure, FetchReport};
pub use downloader::{DownloadOutcome, DownloadReport, ImageDownloader};
pub use notifier::{Notifier, NotifyReport, render_message, text_payload};
pub use quote::QuoteClient;
