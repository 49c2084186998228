use crate::runner::session::ResultRow;
use anyhow::{Context, Result};
use log::warn;
use std::path::{Path, PathBuf};

pub const RESULT_FILE: &str = "extracted_data.csv";

/// Write all rows, in order, to `<directory>/extracted_data.csv`
///
/// # Returns
/// The path written, or `None` when there was nothing to write
pub fn write(rows: &[ResultRow], directory: &Path) -> Result<Option<PathBuf>> {
    if rows.is_empty() {
        warn!("No data to save, skipping {}", directory.display());
        return Ok(None);
    }

    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create {}", directory.display()))?;
    let path = directory.join(RESULT_FILE);

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("Failed to write CSV row")?;
    }
    writer.flush()?;

    Ok(Some(path))
}
