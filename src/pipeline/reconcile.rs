//! History reconciliation.
//!
//! Merges freshly fetched records into the stored history, keyed by
//! `enddate`. Fetched records replace stored ones with the same key and the
//! result is always ascending by `enddate`.

use std::collections::BTreeMap;

use crate::models::WallpaperRecord;

/// What a merge did to the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Keys not present before
    pub added: usize,
    /// Keys present before with different content
    pub replaced: usize,
    /// Keys present before with identical content
    pub unchanged: usize,
}

impl MergeSummary {
    /// Check if the merge changed anything.
    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.replaced > 0
    }
}

/// Merged history plus a summary of the merge.
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    pub records: Vec<WallpaperRecord>,
    pub summary: MergeSummary,
}

/// Merge `fetched` into `history`.
///
/// Later entries win on key collision, both within `history` and between
/// `history` and `fetched`.
pub fn reconcile(history: Vec<WallpaperRecord>, fetched: &[WallpaperRecord]) -> Reconciled {
    let mut by_date: BTreeMap<String, WallpaperRecord> = history
        .into_iter()
        .map(|r| (r.enddate.clone(), r))
        .collect();

    let mut summary = MergeSummary::default();
    for record in fetched {
        match by_date.insert(record.enddate.clone(), record.clone()) {
            None => summary.added += 1,
            Some(previous) if previous == *record => summary.unchanged += 1,
            Some(_) => summary.replaced += 1,
        }
    }

    Reconciled {
        records: by_date.into_values().collect(),
        summary,
    }
}
