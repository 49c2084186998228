//! Screen positions of the input field and the result table
//!
//! Positions are captured interactively (the user hovers the mouse over each
//! target and presses ENTER) and can be saved to a JSON record so the next run
//! skips calibration.

use crate::driver::{Coordinate, DesktopDriver};
use crate::utils::prompt::Prompt;
use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of table cells read per value (5 rows x 2 columns)
pub const CELL_COUNT: usize = 10;

/// Number of table rows
pub const TABLE_ROWS: usize = CELL_COUNT / 2;

const RECORD_FILE: &str = "positions.json";

/// Saved form of the positions, as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRecord {
    pub textbox_position: Option<Coordinate>,
    pub cell_positions: Vec<Coordinate>,
    pub saved_date: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum PositionError {
    #[error("textbox position is missing")]
    MissingTextbox,

    #[error("expected {} cell positions, found {found}", CELL_COUNT)]
    CellCount { found: usize },
}

/// Validated positions for one run
#[derive(Debug, Clone, PartialEq)]
pub struct PositionStore {
    textbox: Coordinate,
    cells: [Coordinate; CELL_COUNT],
}

impl PositionStore {
    pub fn new(textbox: Coordinate, cells: [Coordinate; CELL_COUNT]) -> Self {
        Self { textbox, cells }
    }

    pub fn textbox(&self) -> Coordinate {
        self.textbox
    }

    /// Cells in row-major order: row 1 col 1, row 1 col 2, row 2 col 1, ...
    pub fn cells(&self) -> &[Coordinate; CELL_COUNT] {
        &self.cells
    }

    pub fn to_record(&self) -> PositionRecord {
        PositionRecord {
            textbox_position: Some(self.textbox),
            cell_positions: self.cells.to_vec(),
            saved_date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Write the positions to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.to_record())?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write positions to {}", path.display()))?;
        Ok(())
    }

    /// Capture the textbox and all ten cells interactively
    pub async fn capture_all(
        prompt: &mut dyn Prompt,
        driver: &mut dyn DesktopDriver,
    ) -> Result<Self> {
        println!(
            "\n{} Set the TEXTBOX position (where values are typed)",
            "Step 1:".bold()
        );
        let textbox = capture("the textbox", prompt, driver).await?;

        println!(
            "\n{} Set positions for the table cells ({} rows x 2 columns)",
            "Step 2:".bold(),
            TABLE_ROWS
        );
        let mut cells = [Coordinate::new(0, 0); CELL_COUNT];
        for (index, slot) in cells.iter_mut().enumerate() {
            let role = cell_role(index);
            println!("Setting position {}/{}: {}", index + 1, CELL_COUNT, role);
            *slot = capture(&role, prompt, driver).await?;
        }

        println!(
            "{} All {} cell positions set",
            "✓".green(),
            CELL_COUNT
        );
        Ok(Self::new(textbox, cells))
    }
}

impl TryFrom<PositionRecord> for PositionStore {
    type Error = PositionError;

    fn try_from(record: PositionRecord) -> Result<Self, Self::Error> {
        let textbox = record
            .textbox_position
            .ok_or(PositionError::MissingTextbox)?;
        let found = record.cell_positions.len();
        let cells: [Coordinate; CELL_COUNT] = record
            .cell_positions
            .try_into()
            .map_err(|_| PositionError::CellCount { found })?;
        Ok(Self::new(textbox, cells))
    }
}

/// Human-readable role of a cell, e.g. "Row 2, Col 1"
pub fn cell_role(index: usize) -> String {
    format!("Row {}, Col {}", index / 2 + 1, index % 2 + 1)
}

/// Wait for the user to hover over `role`, then sample the cursor
pub async fn capture(
    role: &str,
    prompt: &mut dyn Prompt,
    driver: &mut dyn DesktopDriver,
) -> Result<Coordinate> {
    let question = format!("Move the mouse over {} and press ENTER:", role);
    if prompt.ask(&question)?.is_none() {
        anyhow::bail!("Input closed while capturing {}", role);
    }

    let position = driver
        .cursor_position()
        .await
        .with_context(|| format!("Failed to read cursor for {}", role))?;
    println!("  {} {}: {}", "✓".green(), role, position.to_string().cyan());
    Ok(position)
}

/// Default location of the saved record: `~/.param-sweeper/positions.json`
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".param-sweeper").join(RECORD_FILE))
}

/// Read a saved record
///
/// # Returns
/// `None` if the file is absent or cannot be parsed
pub fn load(path: &Path) -> Option<PositionRecord> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("No saved positions at {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Ignoring malformed positions file {}: {}", path.display(), e);
            None
        }
    }
}

/// Delete the saved record
///
/// # Returns
/// Whether a record existed
pub fn clear(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to delete {}", path.display())),
    }
}

/// Print the saved record
pub fn show(path: &Path) {
    let Some(record) = load(path) else {
        println!(
            "{} No saved positions at {}",
            "ℹ".blue(),
            path.display().to_string().cyan()
        );
        return;
    };

    println!(
        "{} Saved positions ({})",
        "📍".to_string().blue(),
        path.display().to_string().cyan()
    );
    println!("  Saved: {}", record.saved_date);
    match record.textbox_position {
        Some(pos) => println!("  Textbox: {}", pos),
        None => println!("  Textbox: {}", "not set".yellow()),
    }
    for (index, pos) in record.cell_positions.iter().enumerate() {
        println!("  {}: {}", cell_role(index), pos);
    }
    if record.cell_positions.len() != CELL_COUNT {
        println!(
            "  {} {} cell positions recorded, {} expected",
            "⚠".yellow(),
            record.cell_positions.len(),
            CELL_COUNT
        );
    }
}
