//! # Serial Datetime
//!
//! A small serial tool built with the Bevy game engine: pick a port and baud
//! rate, connect, enter or pick a date and time, and send it to the device as
//! one JSON object.
//!
//! ## Architecture
//!
//! The project is organized into the following modules:
//!
//! - [`serial`]: connection manager, transport seam and the JSON transmitter
//! - [`form`]: the date/time form state and calendar integration
//! - [`serial_ui`]: egui form wiring button clicks to the above
//! - [`error`]: Custom error types for the application

pub mod error;
pub mod form;
pub mod serial;
pub mod serial_ui;

/// Re-exports for convenience
pub mod prelude {
    pub use crate::error::*;
    pub use crate::form::{DateTimeForm, FormPlugin};
    pub use crate::serial::SerialPlugin;
    pub use crate::serial_ui::SerialUiPlugin;
}
