pub mod driver;
pub mod positions;
pub mod report;
pub mod runner;
pub mod utils;

// Re-export common items
pub use report::save_results;
pub use runner::run_sweep;
