//! Kiosk side of buscall.
//!
//! Watches the call button and, on every press, sends the route image and
//! the waiting-passenger message to the depot receiver.
//!
//! - [`ButtonMonitor`] samples a [`DigitalInputSource`] and fires on rising edges
//! - [`Transmitter`] loads the image from an [`ImageStore`] and sends both datagrams

pub mod edge;
pub mod error;
pub mod input;
pub mod monitor;
pub mod store;
pub mod transmitter;

pub use edge::EdgeDetector;
pub use error::{KioskError, Result, StoreError};
pub use input::{
    DigitalInputSource, ScriptedInput, SysfsInput, DEFAULT_BUTTON_PIN, DEFAULT_GPIO_ROOT,
};
pub use monitor::{ButtonMonitor, MonitorConfig, PollOutcome, Trigger};
pub use store::{validate_route, DirectoryStore, ImageStore};
pub use transmitter::{ChannelOutcome, TransmitReport, Transmitter, TransmitterConfig};
