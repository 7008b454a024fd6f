//! Depot side of buscall.
//!
//! Listens on the image and text channels, overwrites one file with the
//! latest image, and hands every message to the caller for display.

pub mod artifact;
pub mod error;
pub mod receiver;

pub use artifact::{ImageArtifact, DEFAULT_ARTIFACT};
pub use error::{DepotError, Result};
pub use receiver::{ReceiveEvent, Receiver, ReceiverConfig};
