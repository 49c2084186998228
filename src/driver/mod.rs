pub mod desktop;
pub mod error;
pub mod input;
pub mod table;
pub mod traits;

#[cfg(test)]
pub mod fake;

pub use desktop::SystemDriver;
pub use error::{DriverError, DriverResult};
pub use traits::{Coordinate, DesktopDriver, KeyAction};
