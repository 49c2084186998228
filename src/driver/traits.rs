use super::error::DriverResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Absolute screen coordinate in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Keys the sweep needs to press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Backspace,
    Enter,
}

/// Desktop input and clipboard interface
///
/// Every primitive the gestures are built from goes through this trait so that
/// the sweep can run against the real desktop or against a scripted driver.
/// Implementations are driven from a single task; nothing here is `Send`.
#[async_trait(?Send)]
pub trait DesktopDriver {
    /// Name of the input backend (e.g., "enigo")
    fn backend_name(&self) -> &str;

    /// Current mouse cursor location
    async fn cursor_position(&mut self) -> DriverResult<Coordinate>;

    /// Move to a coordinate and click the left button once
    async fn click(&mut self, at: Coordinate) -> DriverResult<()>;

    /// Move to a coordinate and click the left button twice
    async fn double_click(&mut self, at: Coordinate) -> DriverResult<()>;

    /// Press and release a key `presses` times
    async fn press_key(&mut self, key: KeyAction, presses: u32) -> DriverResult<()>;

    /// Type text at the current focus
    async fn type_text(&mut self, text: &str) -> DriverResult<()>;

    /// Send the platform copy chord (Ctrl+C, or Cmd+C on macOS)
    async fn copy_selection(&mut self) -> DriverResult<()>;

    /// Read the clipboard as text
    ///
    /// # Returns
    /// The clipboard text, or an empty string if it holds no text
    async fn clipboard_text(&mut self) -> DriverResult<String>;
}
