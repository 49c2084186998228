//! Console prompts for calibration and sweep settings

use super::config::SweepDefaults;
use anyhow::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Source of answers to interactive questions
pub trait Prompt {
    /// Show `message` and read one line
    ///
    /// # Returns
    /// The line without its trailing newline, or `None` at end of input
    fn ask(&mut self, message: &str) -> Result<Option<String>>;
}

/// Prompt reading from standard input
pub struct ConsolePrompt;

impl Prompt for ConsolePrompt {
    fn ask(&mut self, message: &str) -> Result<Option<String>> {
        print!("{} ", message.bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            return Ok(None); // EOF
        }
        Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Sweep range and delay, already resolved to numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSettings {
    pub start: f64,
    pub end: f64,
    pub step: f64,
    pub delay_secs: f64,
}

impl From<SweepDefaults> for SweepSettings {
    fn from(d: SweepDefaults) -> Self {
        Self {
            start: d.start,
            end: d.end,
            step: d.step,
            delay_secs: d.delay_secs,
        }
    }
}

/// Values given on the command line; those present skip their prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOverrides {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub step: Option<f64>,
    pub delay_secs: Option<f64>,
}

/// Parse one answer. Empty input takes the default.
fn parse_answer(answer: Option<&str>, default: f64) -> Option<f64> {
    match answer.map(str::trim) {
        None | Some("") => Some(default),
        Some(text) => text.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Ask for every setting not given on the command line
///
/// If any answer fails to parse, every prompted setting falls back to its
/// default, not just the bad one.
pub fn read_sweep_settings(
    prompt: &mut dyn Prompt,
    defaults: &SweepDefaults,
    overrides: &SweepOverrides,
) -> Result<SweepSettings> {
    let questions: [(Option<f64>, String, f64); 4] = [
        (overrides.start, format!("Start value (e.g., {}):", defaults.start), defaults.start),
        (overrides.end, format!("End value (e.g., {}):", defaults.end), defaults.end),
        (overrides.step, "Step size (e.g., 1 or 0.5):".to_string(), defaults.step),
        (
            overrides.delay_secs,
            format!(
                "Delay after pressing Enter (seconds, default {}):",
                defaults.delay_secs
            ),
            defaults.delay_secs,
        ),
    ];

    let mut resolved = [0.0f64; 4];
    let mut parse_failed = false;

    for (slot, (given, question, default)) in resolved.iter_mut().zip(questions.iter()) {
        if let Some(value) = given {
            *slot = *value;
            continue;
        }
        let answer = prompt.ask(question)?;
        match parse_answer(answer.as_deref(), *default) {
            Some(value) => *slot = value,
            None => {
                parse_failed = true;
                *slot = *default;
            }
        }
    }

    if parse_failed {
        println!(
            "{} Invalid input, using defaults ({} to {}, step {}, delay {})",
            "⚠".yellow(),
            defaults.start,
            defaults.end,
            defaults.step,
            defaults.delay_secs
        );
        for (slot, (given, _, default)) in resolved.iter_mut().zip(questions.iter()) {
            *slot = given.unwrap_or(*default);
        }
    }

    let [start, end, step, delay_secs] = resolved;
    Ok(SweepSettings {
        start,
        end,
        step,
        delay_secs,
    })
}

/// Prompt answering from a fixed script, for tests
#[cfg(test)]
pub struct ScriptedPrompt {
    pub answers: std::collections::VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn ask(&mut self, message: &str) -> Result<Option<String>> {
        self.asked.push(message.to_string());
        Ok(self.answers.pop_front())
    }
}
