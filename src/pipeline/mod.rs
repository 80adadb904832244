//! Pipeline entry points for archiver operations.
//!
//! - `reconcile`: Merge fetched records into the history store
//! - `run_archiver`: Run fetch → reconcile → download → notify once

pub mod reconcile;
pub mod run;

pub use reconcile::{MergeSummary, Reconciled, reconcile};
pub use run::{RunOutcome, RunReport, run_archiver};
