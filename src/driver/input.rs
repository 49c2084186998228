//! Input gesture: replace the contents of the target field and commit

use super::error::DriverResult;
use super::traits::{Coordinate, DesktopDriver, KeyAction};
use crate::utils::config::GestureTiming;
use std::time::Duration;

/// Focus the field, clear it, type `text` and press Enter.
///
/// Clearing uses a fixed number of Backspace presses (`timing.clear_presses`),
/// enough for the expected value lengths. Nothing checks that the field
/// actually received the text.
pub async fn set_value(
    driver: &mut dyn DesktopDriver,
    field: Coordinate,
    text: &str,
    timing: &GestureTiming,
) -> DriverResult<()> {
    driver.double_click(field).await?;
    pause(timing.input_settle()).await;

    driver
        .press_key(KeyAction::Backspace, timing.clear_presses)
        .await?;
    pause(timing.input_settle()).await;

    driver.type_text(text).await?;
    driver.press_key(KeyAction::Enter, 1).await
}

pub(crate) async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
