//! Progress reporting hooks.
//!
//! The converter never logs progress itself beyond `debug` events; callers
//! that want per-row or per-column output implement [`ConversionObserver`].

use std::time::Duration;

use crate::classify::{Companion, RuleKind, SkipReason};

/// Receives progress callbacks while rows are converted.
///
/// All methods have empty defaults, so implementors pick what they need.
/// `row` is always the 1-based data row number.
pub trait ConversionObserver {
    /// Called when a document iterator is created, with the number of records.
    fn conversion_started(&self, _rows: usize) {}

    fn row_started(&self, _row: usize, _label: Option<&str>) {}

    fn column_applied(&self, _row: usize, _column: &str, _rule: RuleKind) {}

    fn column_skipped(&self, _row: usize, _column: &str, _reason: SkipReason) {}

    /// A rule expected a companion column that the table does not have.
    fn missing_companion(&self, _row: usize, _column: &str, _companion: Companion) {}

    fn row_finished(&self, _row: usize, _elapsed: Duration) {}

    /// Called once when the document iterator is exhausted.
    fn conversion_finished(&self, _rows: usize, _elapsed: Duration) {}
}

/// Observer that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ConversionObserver for NoopObserver {}

impl<O: ConversionObserver + ?Sized> ConversionObserver for &O {
    fn conversion_started(&self, rows: usize) {
        (**self).conversion_started(rows);
    }

    fn row_started(&self, row: usize, label: Option<&str>) {
        (**self).row_started(row, label);
    }

    fn column_applied(&self, row: usize, column: &str, rule: RuleKind) {
        (**self).column_applied(row, column, rule);
    }

    fn column_skipped(&self, row: usize, column: &str, reason: SkipReason) {
        (**self).column_skipped(row, column, reason);
    }

    fn missing_companion(&self, row: usize, column: &str, companion: Companion) {
        (**self).missing_companion(row, column, companion);
    }

    fn row_finished(&self, row: usize, elapsed: Duration) {
        (**self).row_finished(row, elapsed);
    }

    fn conversion_finished(&self, rows: usize, elapsed: Duration) {
        (**self).conversion_finished(rows, elapsed);
    }
}
