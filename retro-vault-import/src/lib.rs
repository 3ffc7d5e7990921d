//! Bring catalog data in from other stores.
//!
//! The only source today is a secondary catalog database, merged into the
//! primary once at startup without ever overwriting existing rows.

pub mod merge;
pub mod progress;

pub use merge::{
    merge_secondary, MergeError, MergeOutcome, MergeStats, RowOutcome, TableMerge,
};
pub use progress::{LogProgress, MergeProgress, SilentProgress};
