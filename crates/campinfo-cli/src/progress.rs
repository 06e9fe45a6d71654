//! Console progress for conversion runs.

use std::cell::RefCell;
use std::collections::HashSet;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{debug, info, trace, warn};

use campinfo_transform::{Companion, ConversionObserver, RuleKind, SkipReason};

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}";

/// Maps converter callbacks to log events and a progress bar.
///
/// Data-shape warnings are logged once per column, not once per row.
pub struct TracingObserver {
    bar: ProgressBar,
    warned: RefCell<HashSet<String>>,
}

impl TracingObserver {
    pub fn new(show_progress: bool) -> Self {
        let bar = ProgressBar::with_draw_target(
            None,
            if show_progress {
                ProgressDrawTarget::stderr()
            } else {
                ProgressDrawTarget::hidden()
            },
        );
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self {
            bar,
            warned: RefCell::default(),
        }
    }

    fn first_warning(&self, column: &str) -> bool {
        self.warned.borrow_mut().insert(column.to_string())
    }
}

impl ConversionObserver for TracingObserver {
    fn conversion_started(&self, rows: usize) {
        self.bar.set_length(rows as u64);
    }

    fn row_started(&self, row: usize, label: Option<&str>) {
        let label = label.unwrap_or_default();
        debug!(row, label, "processing row");
        self.bar.set_message(label.to_string());
    }

    fn column_applied(&self, row: usize, column: &str, rule: RuleKind) {
        trace!(row, column, rule = %rule, "column applied");
    }

    fn column_skipped(&self, row: usize, column: &str, reason: SkipReason) {
        match reason {
            SkipReason::Companion(companion) => {
                trace!(row, column, kind = companion.as_str(), "companion column");
            }
            SkipReason::Unrecognized => {
                if self.first_warning(column) {
                    self.bar.suspend(|| {
                        warn!(row, column, "column has no element in the template; skipped");
                    });
                }
            }
        }
    }

    fn missing_companion(&self, row: usize, column: &str, companion: Companion) {
        if self.first_warning(column) {
            self.bar.suspend(|| {
                warn!(
                    row,
                    column,
                    companion = companion.as_str(),
                    "companion column is missing; treated as empty"
                );
            });
        }
    }

    fn row_finished(&self, row: usize, elapsed: Duration) {
        debug!(row, elapsed_ms = elapsed.as_millis(), "row finished");
        self.bar.inc(1);
    }

    fn conversion_finished(&self, rows: usize, elapsed: Duration) {
        self.bar.finish_and_clear();
        info!(rows, elapsed_ms = elapsed.as_millis(), "processed all rows");
    }
}
