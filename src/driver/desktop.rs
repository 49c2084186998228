//! Desktop driver backed by the real OS input queue and clipboard
//!
//! Mouse and keyboard events are injected with `enigo`, clipboard text is read
//! with `arboard`. Both handles are created once and kept for the whole run.

use super::error::{DriverError, DriverResult};
use super::traits::{Coordinate, DesktopDriver, KeyAction};
use arboard::Clipboard;
use async_trait::async_trait;
use enigo::{Button, Direction, Enigo, Key, Keyboard, Mouse, Settings};

#[cfg(target_os = "macos")]
const COPY_MODIFIER: Key = Key::Meta;
#[cfg(not(target_os = "macos"))]
const COPY_MODIFIER: Key = Key::Control;

pub struct SystemDriver {
    enigo: Enigo,
    clipboard: Clipboard,
}

impl SystemDriver {
    pub fn new() -> DriverResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| DriverError::Unavailable(format!("input simulator: {}", e)))?;
        let clipboard = Clipboard::new()
            .map_err(|e| DriverError::Unavailable(format!("clipboard: {}", e)))?;

        Ok(Self { enigo, clipboard })
    }

    fn move_to(&mut self, at: Coordinate) -> DriverResult<()> {
        self.enigo
            .move_mouse(at.x, at.y, enigo::Coordinate::Abs)
            .map_err(|e| DriverError::input("move mouse", e))
    }

    fn left_click(&mut self, action: &'static str) -> DriverResult<()> {
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|e| DriverError::input(action, e))
    }
}

#[async_trait(?Send)]
impl DesktopDriver for SystemDriver {
    fn backend_name(&self) -> &str {
        "enigo"
    }

    async fn cursor_position(&mut self) -> DriverResult<Coordinate> {
        let (x, y) = self
            .enigo
            .location()
            .map_err(|e| DriverError::input("read cursor", e))?;
        Ok(Coordinate::new(x, y))
    }

    async fn click(&mut self, at: Coordinate) -> DriverResult<()> {
        self.move_to(at)?;
        self.left_click("click")
    }

    async fn double_click(&mut self, at: Coordinate) -> DriverResult<()> {
        self.move_to(at)?;
        self.left_click("double click")?;
        self.left_click("double click")
    }

    async fn press_key(&mut self, key: KeyAction, presses: u32) -> DriverResult<()> {
        let (key, action) = match key {
            KeyAction::Backspace => (Key::Backspace, "backspace"),
            KeyAction::Enter => (Key::Return, "enter"),
        };
        for _ in 0..presses {
            self.enigo
                .key(key, Direction::Click)
                .map_err(|e| DriverError::input(action, e))?;
        }
        Ok(())
    }

    async fn type_text(&mut self, text: &str) -> DriverResult<()> {
        self.enigo
            .text(text)
            .map_err(|e| DriverError::input("type text", e))
    }

    async fn copy_selection(&mut self) -> DriverResult<()> {
        self.enigo
            .key(COPY_MODIFIER, Direction::Press)
            .map_err(|e| DriverError::input("copy", e))?;
        let chord = self.enigo.key(Key::Unicode('c'), Direction::Click);
        // Release the modifier even when the chord failed, or it stays held.
        let release = self.enigo.key(COPY_MODIFIER, Direction::Release);

        chord.map_err(|e| DriverError::input("copy", e))?;
        release.map_err(|e| DriverError::input("copy", e))
    }

    async fn clipboard_text(&mut self) -> DriverResult<String> {
        match self.clipboard.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(DriverError::Clipboard(e.to_string())),
        }
    }
}
