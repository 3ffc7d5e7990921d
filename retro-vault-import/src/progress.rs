//! Merge progress reporting.

use crate::merge::{MergeStats, TableMerge};

/// Trait for receiving merge progress updates.
pub trait MergeProgress {
    /// Called when a table starts merging, with the secondary's row count.
    fn on_table(&self, table: &str, rows: usize);

    /// Called after each row is attempted.
    fn on_row(&self, table: &str, current: usize, total: usize);

    /// Called when a table has been merged or skipped.
    fn on_table_done(&self, merge: &TableMerge);

    /// Called once the merge has been committed.
    fn on_complete(&self, stats: &MergeStats);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl MergeProgress for SilentProgress {
    fn on_table(&self, _table: &str, _rows: usize) {}
    fn on_row(&self, _table: &str, _current: usize, _total: usize) {}
    fn on_table_done(&self, _merge: &TableMerge) {}
    fn on_complete(&self, _stats: &MergeStats) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl MergeProgress for LogProgress {
    fn on_table(&self, table: &str, rows: usize) {
        log::info!("Merging {} ({} rows)", table, rows);
    }

    fn on_row(&self, table: &str, current: usize, total: usize) {
        if current.is_multiple_of(1000) || current == total {
            log::debug!("  [{}/{}] {}", current, total, table);
        }
    }

    fn on_table_done(&self, merge: &TableMerge) {
        if merge.skipped_missing {
            log::info!("  {}: not present in secondary, skipped", merge.table);
        } else {
            log::info!(
                "  {}: {} inserted, {} already present, {} failed",
                merge.table,
                merge.inserted,
                merge.skipped,
                merge.failed
            );
        }
    }

    fn on_complete(&self, stats: &MergeStats) {
        log::info!(
            "Merge complete: {} inserted, {} already present, {} failed",
            stats.inserted(),
            stats.skipped(),
            stats.failed()
        );
    }
}
