use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Pauses and key counts used by the input and table gestures
    pub timing: GestureTiming,

    /// Values used when a sweep prompt is left empty or fails to parse
    pub defaults: SweepDefaults,

    /// Seconds to count down before the first input is sent
    pub countdown_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timing: GestureTiming::default(),
            defaults: SweepDefaults::default(),
            countdown_secs: 2,
        }
    }
}

/// Fixed pauses that let the target application catch up between actions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureTiming {
    /// Pause between the steps of the input gesture (ms)
    pub input_settle_ms: u64,

    /// Pause after each click of the cell selection gesture (ms)
    pub select_settle_ms: u64,

    /// Pause between the copy chord and the clipboard read (ms)
    pub copy_settle_ms: u64,

    /// Backspace presses used to clear the input field
    pub clear_presses: u32,
}

impl GestureTiming {
    /// No pauses at all; used when the driver is not a real desktop.
    pub fn immediate() -> Self {
        Self {
            input_settle_ms: 0,
            select_settle_ms: 0,
            copy_settle_ms: 0,
            ..Self::default()
        }
    }

    pub fn input_settle(&self) -> Duration {
        Duration::from_millis(self.input_settle_ms)
    }

    pub fn select_settle(&self) -> Duration {
        Duration::from_millis(self.select_settle_ms)
    }

    pub fn copy_settle(&self) -> Duration {
        Duration::from_millis(self.copy_settle_ms)
    }
}

impl Default for GestureTiming {
    fn default() -> Self {
        Self {
            input_settle_ms: 10,
            select_settle_ms: 20,
            copy_settle_ms: 50,
            clear_presses: 10,
        }
    }
}

/// Sweep range and delay defaults for the interactive prompts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepDefaults {
    pub start: f64,
    pub end: f64,
    pub step: f64,
    /// Seconds to wait after committing a value
    pub delay_secs: f64,
}

impl Default for SweepDefaults {
    fn default() -> Self {
        Self {
            start: 1.0,
            end: 10.0,
            step: 1.0,
            delay_secs: 0.2,
        }
    }
}
