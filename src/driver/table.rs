//! Table gesture: select a cell, copy it and read the clipboard

use super::error::DriverResult;
use super::input::pause;
use super::traits::{Coordinate, DesktopDriver};
use crate::utils::config::GestureTiming;
use log::{debug, warn};

/// Label used for a cell in logs (1-based)
pub fn cell_label(index: usize) -> String {
    format!("Cell_{}", index + 1)
}

/// Copy the contents of one cell
///
/// Clicks the cell, double-clicks it to select the contents, sends the copy
/// chord and returns the clipboard text trimmed of surrounding whitespace.
/// An empty or stale clipboard is returned as-is.
pub async fn read_cell(
    driver: &mut dyn DesktopDriver,
    cell: Coordinate,
    timing: &GestureTiming,
) -> DriverResult<String> {
    driver.click(cell).await?;
    pause(timing.select_settle()).await;
    driver.double_click(cell).await?;
    pause(timing.select_settle()).await;

    driver.copy_selection().await?;
    pause(timing.copy_settle()).await;

    let text = driver.clipboard_text().await?;
    Ok(text.trim().to_string())
}

/// Copy every cell in order
///
/// Always yields one string per coordinate. A failed cell is logged and
/// read as an empty string; only a fatal driver error is returned.
pub async fn read_all(
    driver: &mut dyn DesktopDriver,
    cells: &[Coordinate],
    timing: &GestureTiming,
) -> DriverResult<Vec<String>> {
    let mut values = Vec::with_capacity(cells.len());

    for (index, cell) in cells.iter().enumerate() {
        match read_cell(driver, *cell, timing).await {
            Ok(text) => {
                debug!("  {}: '{}'", cell_label(index), text);
                values.push(text);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Error extracting {}: {}", cell_label(index), e);
                values.push(String::new());
            }
        }
    }

    Ok(values)
}
