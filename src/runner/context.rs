use crate::utils::config::Config;
use crate::utils::prompt::SweepOverrides;
use std::path::{Path, PathBuf};

/// Options of one `run` invocation
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Saved position record
    pub positions_path: PathBuf,

    /// Base directory under which the run directory is created
    pub output_base: PathBuf,

    /// Ignore the saved record and capture positions again
    pub recalibrate: bool,

    /// Persist freshly captured positions
    pub save_positions: bool,

    /// Sweep settings given on the command line
    pub overrides: SweepOverrides,

    pub config: Config,
}

/// Runtime information for one sweep run
pub struct RunContext {
    /// Directory holding this run's output, e.g. `./extracted_data_20240101_120000`
    pub output_dir: PathBuf,

    pub positions_path: PathBuf,
}

impl RunContext {
    pub fn new(output_base: &Path, positions_path: &Path) -> Self {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        Self {
            output_dir: output_base.join(format!("extracted_data_{}", stamp)),
            positions_path: positions_path.to_path_buf(),
        }
    }
}
