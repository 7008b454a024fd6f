//! Payload types for the two buscall datagram channels.
//!
//! A kiosk sends two kinds of datagram, each on its own port:
//! - an image (raw bytes, up to 1,000,000 bytes)
//! - a text status message (up to 999,999 bytes)
//!
//! There is no header or envelope. The receiving port identifies the kind.

pub mod channel;
pub mod error;
pub mod payload;

pub use channel::{
    ChannelEndpoint, ChannelKind, EndpointConfig, DEFAULT_RECEIVER_ADDR, IMAGE_PORT, TEXT_PORT,
};
pub use error::{PayloadError, Result};
pub use payload::{ImagePayload, TextPayload, MAX_DATAGRAM_SIZE, MAX_TEXT_SIZE, WAITING_MESSAGE};
