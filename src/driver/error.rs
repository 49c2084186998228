use thiserror::Error;

/// Failure of a single desktop primitive
#[derive(Debug, Error)]
pub enum DriverError {
    /// The input simulator or clipboard could not be reached at all
    #[error("input backend unavailable: {0}")]
    Unavailable(String),

    #[error("{action} failed: {reason}")]
    Input {
        action: &'static str,
        reason: String,
    },

    #[error("clipboard read failed: {0}")]
    Clipboard(String),
}

impl DriverError {
    pub fn input(action: &'static str, reason: impl ToString) -> Self {
        DriverError::Input {
            action,
            reason: reason.to_string(),
        }
    }

    /// Fatal errors end the sweep; the others only spoil one gesture.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DriverError::Unavailable(_))
    }
}

pub type DriverResult<T> = std::result::Result<T, DriverError>;
