use super::values::TestValue;
use crate::driver::{input, table, DesktopDriver};
use crate::positions::{PositionStore, TABLE_ROWS};
use crate::utils::config::GestureTiming;
use colored::Colorize;
use indicatif::ProgressBar;
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// One table row read back for one test value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub test_parameter: TestValue,
    /// 1-based row index within the table snapshot
    pub row_number: u8,
    pub column_1: String,
    pub column_2: String,
}

/// Pair consecutive cells into rows: cells `2r` and `2r + 1` form row `r + 1`.
pub fn rows_from_cells(value: TestValue, cells: &[String]) -> Vec<ResultRow> {
    cells
        .chunks(2)
        .take(TABLE_ROWS)
        .enumerate()
        .map(|(index, pair)| ResultRow {
            test_parameter: value,
            row_number: index as u8 + 1,
            column_1: pair.first().cloned().unwrap_or_default(),
            column_2: pair.get(1).cloned().unwrap_or_default(),
        })
        .collect()
}

/// How a sweep ended
#[derive(Debug, Clone, PartialEq)]
pub enum SweepOutcome {
    Completed,
    /// Stopped by the user between two values
    Interrupted,
    /// Stopped by a fatal driver error
    Aborted { reason: String },
}

/// Rows collected by a sweep and how it ended
#[derive(Debug)]
pub struct SweepReport {
    pub rows: Vec<ResultRow>,
    pub outcome: SweepOutcome,
    /// Values sent to the input field, the priming one included
    pub iterations: usize,
    pub total_values: usize,
}

impl SweepReport {
    /// Number of distinct test values that produced rows
    pub fn parameters_tested(&self) -> usize {
        parameters_tested(&self.rows)
    }
}

pub fn parameters_tested(rows: &[ResultRow]) -> usize {
    rows.iter()
        .map(|row| row.test_parameter.to_string())
        .collect::<HashSet<_>>()
        .len()
}

/// A single sweep over the target application
///
/// The session owns the row accumulator for the whole run and hands it back
/// in the [`SweepReport`], whatever the outcome.
pub struct SweepSession<'a> {
    driver: &'a mut dyn DesktopDriver,
    positions: &'a PositionStore,
    timing: GestureTiming,
    progress: ProgressBar,
    rows: Vec<ResultRow>,
}

impl<'a> SweepSession<'a> {
    pub fn new(
        driver: &'a mut dyn DesktopDriver,
        positions: &'a PositionStore,
        timing: GestureTiming,
    ) -> Self {
        Self {
            driver,
            positions,
            timing,
            progress: ProgressBar::hidden(),
            rows: Vec::new(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    fn say(&self, message: String) {
        if self.progress.is_hidden() {
            println!("{}", message);
        } else {
            self.progress.println(message);
        }
    }

    /// Send every value in order and collect the table after each one
    ///
    /// The first value is the priming run: it is typed and committed but its
    /// table is never read. `cancel` is only checked between values, so a
    /// gesture in progress always completes.
    pub async fn run(
        mut self,
        values: &[TestValue],
        delay: Duration,
        cancel: &AtomicBool,
    ) -> SweepReport {
        let total = values.len();
        let mut iterations = 0;
        let mut outcome = SweepOutcome::Completed;

        for (index, value) in values.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                outcome = SweepOutcome::Interrupted;
                break;
            }
            iterations += 1;
            self.progress
                .set_message(format!("value {}", value.to_string().cyan()));
            debug!("Test {}/{}: value {}", index + 1, total, value);

            let text = value.to_string();
            if let Err(e) =
                input::set_value(self.driver, self.positions.textbox(), &text, &self.timing).await
            {
                if e.is_fatal() {
                    outcome = SweepOutcome::Aborted {
                        reason: e.to_string(),
                    };
                    break;
                }
                warn!("Input gesture for value {} failed: {}", value, e);
            }

            input::pause(delay).await;

            if index == 0 {
                self.say(format!(
                    "  {} Primed with {} (not saved)",
                    "○".dimmed(),
                    value
                ));
                self.progress.inc(1);
                continue;
            }

            let cells = match table::read_all(self.driver, self.positions.cells(), &self.timing)
                .await
            {
                Ok(cells) => cells,
                Err(e) => {
                    outcome = SweepOutcome::Aborted {
                        reason: e.to_string(),
                    };
                    break;
                }
            };

            self.rows.extend(rows_from_cells(*value, &cells));
            self.say(format!("  {} Completed value {}", "✓".green(), value));
            self.progress.inc(1);
        }

        self.progress.finish_and_clear();

        SweepReport {
            rows: self.rows,
            outcome,
            iterations,
            total_values: total,
        }
    }
}
