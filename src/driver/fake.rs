//! Scripted in-memory driver for tests

use super::error::{DriverError, DriverResult};
use super::traits::{Coordinate, DesktopDriver, KeyAction};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Cursor,
    Click(Coordinate),
    DoubleClick(Coordinate),
    Key(KeyAction, u32),
    Type(String),
    Copy,
    ReadClipboard,
}

/// Simulates a text field and a table of cells.
///
/// Double-clicking a cell selects it and the copy chord puts its text on the
/// clipboard. Cells listed in `echo_cells` answer `"<last typed>#<index>"`,
/// which lets tests check which value a row came from.
#[derive(Default)]
pub struct FakeDriver {
    pub actions: Vec<Action>,
    pub typed: Vec<String>,
    pub cursor_script: VecDeque<Coordinate>,
    pub echo_cells: Vec<Coordinate>,
    pub failing_cells: HashSet<Coordinate>,
    pub fail_typing: bool,
    /// Copies after this many succeed with a fatal error
    pub fatal_after_copies: Option<usize>,
    /// Raise the flag once this many copies have completed
    pub cancel_after_copies: Option<(usize, Arc<AtomicBool>)>,
    cell_text: HashMap<Coordinate, String>,
    selected: Option<Coordinate>,
    clipboard: String,
    copies: usize,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_echo_cells(cells: &[Coordinate]) -> Self {
        Self {
            echo_cells: cells.to_vec(),
            ..Self::default()
        }
    }

    pub fn set_cell_text(&mut self, cell: Coordinate, text: &str) {
        self.cell_text.insert(cell, text.to_string());
    }

    fn text_for(&self, cell: Coordinate) -> Option<String> {
        if let Some(text) = self.cell_text.get(&cell) {
            return Some(text.clone());
        }
        let index = self.echo_cells.iter().position(|c| *c == cell)?;
        let last = self.typed.last().map(String::as_str).unwrap_or("");
        Some(format!("{}#{}", last, index))
    }
}

#[async_trait(?Send)]
impl DesktopDriver for FakeDriver {
    fn backend_name(&self) -> &str {
        "fake"
    }

    async fn cursor_position(&mut self) -> DriverResult<Coordinate> {
        self.actions.push(Action::Cursor);
        self.cursor_script
            .pop_front()
            .ok_or_else(|| DriverError::input("read cursor", "no scripted position"))
    }

    async fn click(&mut self, at: Coordinate) -> DriverResult<()> {
        self.actions.push(Action::Click(at));
        Ok(())
    }

    async fn double_click(&mut self, at: Coordinate) -> DriverResult<()> {
        self.actions.push(Action::DoubleClick(at));
        self.selected = Some(at);
        Ok(())
    }

    async fn press_key(&mut self, key: KeyAction, presses: u32) -> DriverResult<()> {
        self.actions.push(Action::Key(key, presses));
        Ok(())
    }

    async fn type_text(&mut self, text: &str) -> DriverResult<()> {
        if self.fail_typing {
            return Err(DriverError::input("type text", "keyboard rejected"));
        }
        self.actions.push(Action::Type(text.to_string()));
        self.typed.push(text.to_string());
        Ok(())
    }

    async fn copy_selection(&mut self) -> DriverResult<()> {
        if let Some(limit) = self.fatal_after_copies {
            if self.copies >= limit {
                return Err(DriverError::Unavailable("display connection lost".into()));
            }
        }
        self.actions.push(Action::Copy);

        if let Some(cell) = self.selected {
            if self.failing_cells.contains(&cell) {
                return Err(DriverError::input("copy", "selection lost"));
            }
            if let Some(text) = self.text_for(cell) {
                self.clipboard = text;
            }
        }

        self.copies += 1;
        if let Some((after, flag)) = &self.cancel_after_copies {
            if self.copies == *after {
                flag.store(true, Ordering::SeqCst);
            }
        }
        Ok(())
    }

    async fn clipboard_text(&mut self) -> DriverResult<String> {
        self.actions.push(Action::ReadClipboard);
        Ok(self.clipboard.clone())
    }
}
