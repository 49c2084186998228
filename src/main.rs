use anyhow::Context;
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::Colorize;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use param_sweeper::driver::SystemDriver;
use param_sweeper::runner::{self, RunOptions};
use param_sweeper::utils::config::Config;
use param_sweeper::utils::prompt::{ConsolePrompt, SweepOverrides};
use param_sweeper::positions;

#[derive(Parser)]
#[command(name = "param-sweeper")]
#[command(version = "0.1.0")]
#[command(about = "Sweep a parameter through a desktop input field and collect table results", long_about = None)]
struct Cli {
    /// Saved position record (default: ~/.param-sweeper/positions.json)
    #[arg(long, global = true)]
    positions: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sweep (default when no command is given)
    Run(RunArgs),

    /// Delete the saved position record
    ClearPositions,

    /// Print the saved position record
    ShowPositions,
}

#[derive(Args)]
struct RunArgs {
    /// Base directory for the timestamped run directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Capture positions again even if a valid record is saved
    #[arg(long, default_value = "false")]
    recalibrate: bool,

    /// Do not save freshly captured positions
    #[arg(long, default_value = "false")]
    no_save: bool,

    /// First value of the sweep (skips the prompt)
    #[arg(long, allow_negative_numbers = true)]
    start: Option<f64>,

    /// Last value of the sweep (skips the prompt)
    #[arg(long, allow_negative_numbers = true)]
    end: Option<f64>,

    /// Step between values (skips the prompt)
    #[arg(long)]
    step: Option<f64>,

    /// Seconds to wait after pressing Enter (skips the prompt)
    #[arg(long)]
    delay: Option<f64>,

    /// Seconds to count down before the first input
    #[arg(long, default_value = "2")]
    countdown: u64,
}

/// Ids of the top-level `run` flags, which only apply without a subcommand
const RUN_ARG_IDS: [&str; 8] = [
    "output",
    "recalibrate",
    "no_save",
    "start",
    "end",
    "step",
    "delay",
    "countdown",
];

fn stray_run_flag(matches: &ArgMatches) -> Option<&'static str> {
    RUN_ARG_IDS
        .into_iter()
        .find(|id| matches.value_source(id) == Some(ValueSource::CommandLine))
}

/// Parse the command line. `--positions` is accepted anywhere; the run flags
/// given before a subcommand are rejected instead of being silently ignored.
fn parse_cli<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = Cli::command();
    let matches = command.try_get_matches_from_mut(args)?;
    let cli = Cli::from_arg_matches(&matches)?;

    if let (Some(sub), Some(id)) = (matches.subcommand_name(), stray_run_flag(&matches)) {
        return Err(command.error(
            ErrorKind::ArgumentConflict,
            format!(
                "'--{}' only applies to a sweep; pass it after 'run', not before '{}'",
                id.replace('_', "-"),
                sub
            ),
        ));
    }
    Ok(cli)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = parse_cli(std::env::args_os()).unwrap_or_else(|e| e.exit());
    let positions_path = match cli.positions {
        Some(path) => path,
        None => positions::default_path()?,
    };

    match cli.command.unwrap_or(Commands::Run(cli.run)) {
        Commands::Run(args) => {
            // First Ctrl+C stops the sweep between values (or keeps it from
            // starting if a prompt is still open), a second one quits.
            let stop_flag = Arc::new(AtomicBool::new(false));
            let stop_flag_handler = stop_flag.clone();
            ctrlc::set_handler(move || {
                if stop_flag_handler.swap(true, Ordering::SeqCst) {
                    std::process::exit(130);
                }
                println!(
                    "\n{} Stop requested: a running sweep ends after the current value, \
                     an open prompt still waits for ENTER and the sweep will not start \
                     (Ctrl+C again to quit)",
                    "⏹️ ".yellow()
                );
            })?;

            let config = Config {
                countdown_secs: args.countdown,
                ..Config::default()
            };
            let options = RunOptions {
                positions_path,
                output_base: args.output,
                recalibrate: args.recalibrate,
                save_positions: !args.no_save,
                overrides: SweepOverrides {
                    start: args.start,
                    end: args.end,
                    step: args.step,
                    delay_secs: args.delay,
                },
                config,
            };

            let mut driver =
                SystemDriver::new().context("Failed to start the desktop input driver")?;
            runner::run_sweep(&mut driver, &mut ConsolePrompt, &options, &stop_flag).await?;
        }

        Commands::ClearPositions => {
            if positions::clear(&positions_path)? {
                println!(
                    "{} Deleted saved positions: {}",
                    "🗑".to_string().blue(),
                    positions_path.display().to_string().cyan()
                );
            } else {
                println!(
                    "{} No saved positions at {}",
                    "ℹ".blue(),
                    positions_path.display().to_string().cyan()
                );
            }
        }

        Commands::ShowPositions => positions::show(&positions_path),
    }

    Ok(())
}
