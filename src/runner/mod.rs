pub mod context;
pub mod session;
pub mod values;

use crate::driver::DesktopDriver;
use crate::positions::{self, PositionStore};
use crate::utils::prompt::{self, Prompt};
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub use context::{RunContext, RunOptions};
pub use session::{ResultRow, SweepOutcome, SweepReport, SweepSession};
pub use values::{generate_values, SweepRange, TestValue};

/// Result of a full run
#[derive(Debug)]
pub struct RunSummary {
    pub report: SweepReport,
    /// CSV written for the run, if any rows were collected and saved
    pub output_file: Option<PathBuf>,
}

/// Run the full workflow: positions, settings, countdown, sweep, save
pub async fn run_sweep(
    driver: &mut dyn DesktopDriver,
    prompt: &mut dyn Prompt,
    options: &RunOptions,
    cancel: &AtomicBool,
) -> Result<RunSummary> {
    let context = RunContext::new(&options.output_base, &options.positions_path);

    println!(
        "{} Parameter sweep using {} input",
        "▶".green().bold(),
        driver.backend_name().cyan()
    );
    println!("  Positions: {}", context.positions_path.display().to_string().cyan());
    println!("  Output: {}", context.output_dir.display().to_string().cyan());
    println!("  CSV columns: test_parameter, row_number, column_1, column_2");

    let store = resolve_positions(driver, prompt, options, &context).await?;

    println!("\n{}", "Parameter Range Configuration:".bold());
    let settings =
        prompt::read_sweep_settings(prompt, &options.config.defaults, &options.overrides)?;
    let range = SweepRange::new(settings.start, settings.end, settings.step);
    let delay = Duration::try_from_secs_f64(settings.delay_secs)
        .with_context(|| format!("Invalid delay: {}", settings.delay_secs))?;

    let values = generate_values(&range)?;
    println!(
        "\nTest range: {} to {}, step {}, delay {:?}",
        range.start, range.end, range.step, delay
    );
    println!(
        "Test values: [{}]",
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Will send {} values", values.len());
    println!("Note: the first value is sent twice and only the second result is saved");
    println!("Press Ctrl+C to stop early");

    if cancel.load(Ordering::SeqCst) {
        println!(
            "\n{} Stopped by user before the sweep started, nothing was sent",
            "⏹️ ".yellow()
        );
        return Ok(RunSummary {
            report: SweepReport {
                rows: Vec::new(),
                outcome: SweepOutcome::Interrupted,
                iterations: 0,
                total_values: values.len(),
            },
            output_file: None,
        });
    }

    countdown(options.config.countdown_secs).await;

    let progress = if std::io::stdout().is_terminal() {
        let style = ProgressStyle::default_bar()
            .template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        ProgressBar::new(values.len() as u64).with_style(style)
    } else {
        ProgressBar::hidden()
    };

    let report = SweepSession::new(driver, &store, options.config.timing)
        .with_progress(progress)
        .run(&values, delay, cancel)
        .await;

    match &report.outcome {
        SweepOutcome::Completed => {
            println!(
                "\n{} Parameter testing complete! {}/{} values sent",
                "✅".green(),
                report.iterations,
                report.total_values
            );
            println!(
                "Generated {} total rows ({} rows per parameter)",
                report.rows.len(),
                positions::TABLE_ROWS
            );
        }
        SweepOutcome::Interrupted => {
            println!("\n{} Parameter testing stopped by user.", "⏹️ ".yellow());
            println!(
                "Completed {} parameters, collected {} rows",
                report.parameters_tested(),
                report.rows.len()
            );
        }
        SweepOutcome::Aborted { reason } => {
            println!("\n{} Error during parameter testing: {}", "❌".red(), reason);
            println!(
                "Keeping {} rows collected before the error",
                report.rows.len()
            );
        }
    }

    let output_file = crate::report::save_results(&report.rows, &context.output_dir);

    Ok(RunSummary {
        report,
        output_file,
    })
}

/// Use the saved positions when they are valid, otherwise capture new ones
async fn resolve_positions(
    driver: &mut dyn DesktopDriver,
    prompt: &mut dyn Prompt,
    options: &RunOptions,
    context: &RunContext,
) -> Result<PositionStore> {
    if !options.recalibrate {
        match positions::load(&context.positions_path) {
            Some(record) => {
                let saved_date = record.saved_date.clone();
                match PositionStore::try_from(record) {
                    Ok(store) => {
                        println!(
                            "{} Using positions saved {}",
                            "✓".green(),
                            saved_date.cyan()
                        );
                        return Ok(store);
                    }
                    Err(e) => println!(
                        "{} Saved positions are invalid ({}), capturing again",
                        "⚠".yellow(),
                        e
                    ),
                }
            }
            None => println!("{} No saved positions, starting calibration", "ℹ".blue()),
        }
    }

    let store = PositionStore::capture_all(prompt, driver)
        .await
        .context("Failed to capture positions")?;

    if options.save_positions {
        match store.save(&context.positions_path) {
            Ok(()) => println!(
                "{} Positions saved to {}",
                "✓".green(),
                context.positions_path.display().to_string().cyan()
            ),
            Err(e) => warn!("Could not save positions: {:#}", e),
        }
    }

    Ok(store)
}

async fn countdown(secs: u64) {
    if secs == 0 {
        return;
    }
    println!("\nStarting parameter testing in {} seconds...", secs);
    for i in (1..=secs).rev() {
        println!("{}...", i);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    println!("Starting!");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::fake::{Action, FakeDriver};
    use crate::driver::Coordinate;
    use crate::positions::{PositionRecord, CELL_COUNT, TABLE_ROWS};
    use crate::utils::config::{Config, GestureTiming};
    use crate::utils::prompt::{ScriptedPrompt, SweepOverrides};
    use std::sync::Arc;

    struct Fixture {
        root: PathBuf,
        options: RunOptions,
    }

    impl Fixture {
        fn new() -> Self {
            let root =
                std::env::temp_dir().join(format!("param-sweeper-{}", uuid::Uuid::new_v4()));
            let config = Config {
                timing: GestureTiming::immediate(),
                countdown_secs: 0,
                ..Config::default()
            };
            let options = RunOptions {
                positions_path: root.join("positions.json"),
                output_base: root.join("out"),
                recalibrate: false,
                save_positions: true,
                overrides: SweepOverrides::default(),
                config,
            };
            Self { root, options }
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    fn screen() -> Vec<Coordinate> {
        (0..=CELL_COUNT as i32).map(|i| Coordinate::new(20 * i, 40)).collect()
    }

    fn calibrating_driver() -> FakeDriver {
        let points = screen();
        let mut driver = FakeDriver::with_echo_cells(&points[1..]);
        driver.cursor_script = points.into_iter().collect();
        driver
    }

    fn answers_with_calibration(settings: &[&str]) -> ScriptedPrompt {
        let mut answers = vec![""; CELL_COUNT + 1];
        answers.extend_from_slice(settings);
        ScriptedPrompt::new(&answers)
    }

    #[tokio::test]
    async fn test_full_run_writes_csv_and_positions() {
        let fixture = Fixture::new();
        let mut driver = calibrating_driver();
        let mut prompt = answers_with_calibration(&["1", "3", "1", "0"]);

        let summary = run_sweep(
            &mut driver,
            &mut prompt,
            &fixture.options,
            &AtomicBool::new(false),
        )
        .await
        .unwrap();

        assert_eq!(summary.report.outcome, SweepOutcome::Completed);
        assert_eq!(summary.report.rows.len(), 15);

        let csv_path = summary.output_file.expect("CSV should be written");
        let content = std::fs::read_to_string(csv_path).unwrap();
        assert_eq!(content.lines().count(), 16);
        assert!(content.lines().nth(1).unwrap().starts_with("1,1,1#0,1#1"));

        let saved = positions::load(&fixture.options.positions_path).unwrap();
        assert_eq!(saved.cell_positions.len(), CELL_COUNT);
    }

    #[tokio::test]
    async fn test_short_record_forces_recapture() {
        let fixture = Fixture::new();
        let short = PositionRecord {
            textbox_position: Some(Coordinate::new(1, 1)),
            cell_positions: screen()[..8].to_vec(),
            saved_date: "2024-01-01 00:00:00".to_string(),
        };
        std::fs::create_dir_all(&fixture.root).unwrap();
        std::fs::write(
            &fixture.options.positions_path,
            serde_json::to_string(&short).unwrap(),
        )
        .unwrap();

        let mut driver = calibrating_driver();
        let mut prompt = answers_with_calibration(&["2", "2", "1", "0"]);

        let summary = run_sweep(
            &mut driver,
            &mut prompt,
            &fixture.options,
            &AtomicBool::new(false),
        )
        .await
        .unwrap();

        let cursor_reads = driver
            .actions
            .iter()
            .filter(|a| **a == Action::Cursor)
            .count();
        assert_eq!(cursor_reads, CELL_COUNT + 1);
        assert_eq!(summary.report.rows.len(), 5);
    }

    #[tokio::test]
    async fn test_valid_record_skips_calibration() {
        let fixture = Fixture::new();
        let points = screen();
        let cells: [Coordinate; CELL_COUNT] = points[1..].to_vec().try_into().unwrap();
        PositionStore::new(points[0], cells)
            .save(&fixture.options.positions_path)
            .unwrap();

        let mut driver = FakeDriver::with_echo_cells(&points[1..]);
        let mut prompt = ScriptedPrompt::new(&["5", "6", "1", "0"]);

        let summary = run_sweep(
            &mut driver,
            &mut prompt,
            &fixture.options,
            &AtomicBool::new(false),
        )
        .await
        .unwrap();

        assert!(!driver.actions.contains(&Action::Cursor));
        assert_eq!(prompt.asked.len(), 4);
        assert_eq!(summary.report.rows.len(), 10);
        assert_eq!(summary.report.parameters_tested(), 2);
    }

    #[tokio::test]
    async fn test_stop_during_prompts_never_starts_sweep() {
        let fixture = Fixture::new();
        let mut driver = calibrating_driver();
        let mut prompt = answers_with_calibration(&["1", "3", "1", "0"]);

        let summary = run_sweep(
            &mut driver,
            &mut prompt,
            &fixture.options,
            &AtomicBool::new(true),
        )
        .await
        .unwrap();

        assert_eq!(summary.report.outcome, SweepOutcome::Interrupted);
        assert_eq!(summary.report.iterations, 0);
        assert!(summary.output_file.is_none());
        assert!(!driver
            .actions
            .iter()
            .any(|a| matches!(a, Action::Type(_) | Action::DoubleClick(_))));
    }

    #[tokio::test]
    async fn test_interrupted_sweep_writes_collected_rows() {
        let fixture = Fixture::new();
        let cancel = Arc::new(AtomicBool::new(false));
        let mut driver = calibrating_driver();
        // Ctrl+C arrives once the tables for values 1 and 2 are copied
        driver.cancel_after_copies = Some((2 * CELL_COUNT, cancel.clone()));
        let mut prompt = answers_with_calibration(&["1", "5", "1", "0"]);

        let summary = run_sweep(&mut driver, &mut prompt, &fixture.options, &cancel)
            .await
            .unwrap();

        assert_eq!(summary.report.outcome, SweepOutcome::Interrupted);
        assert_eq!(summary.report.rows.len(), 2 * TABLE_ROWS);

        let csv_path = summary.output_file.expect("partial CSV should be written");
        let content = std::fs::read_to_string(csv_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1 + 2 * TABLE_ROWS);
        assert_eq!(lines[0], "test_parameter,row_number,column_1,column_2");
        assert!(lines[1..6].iter().all(|l| l.starts_with("1,")));
        assert!(lines[6..].iter().all(|l| l.starts_with("2,")));
    }

    #[tokio::test]
    async fn test_aborted_sweep_writes_collected_rows() {
        let fixture = Fixture::new();
        let mut driver = calibrating_driver();
        driver.fatal_after_copies = Some(CELL_COUNT + 3);
        let mut prompt = answers_with_calibration(&["1", "4", "1", "0"]);

        let summary = run_sweep(
            &mut driver,
            &mut prompt,
            &fixture.options,
            &AtomicBool::new(false),
        )
        .await
        .unwrap();

        assert!(matches!(summary.report.outcome, SweepOutcome::Aborted { .. }));
        assert_eq!(summary.report.rows.len(), TABLE_ROWS);

        let csv_path = summary.output_file.expect("partial CSV should be written");
        let content = std::fs::read_to_string(csv_path).unwrap();
        assert_eq!(content.lines().count(), 1 + TABLE_ROWS);
        assert!(content.lines().skip(1).all(|l| l.starts_with("1,")));
    }

    #[tokio::test]
    async fn test_invalid_step_is_rejected() {
        let mut fixture = Fixture::new();
        fixture.options.overrides = SweepOverrides {
            start: Some(1.0),
            end: Some(2.0),
            step: Some(-1.0),
            delay_secs: Some(0.0),
        };
        let mut driver = calibrating_driver();
        let mut prompt = answers_with_calibration(&[]);

        let result = run_sweep(
            &mut driver,
            &mut prompt,
            &fixture.options,
            &AtomicBool::new(false),
        )
        .await;

        assert!(result.is_err());
    }
}
