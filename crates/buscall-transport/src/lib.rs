//! Unacknowledged datagram transport.
//!
//! Provides one-way datagram channels with best-effort delivery:
//! - UDP sockets (non-blocking receive, fixed-destination send)
//! - In-memory links with the same semantics, for in-process wiring
//!
//! This is the lowest layer of buscall. Everything else builds on the
//! [`DatagramSender`] and [`DatagramReceiver`] traits provided here.

pub mod error;
pub mod memory;
pub mod traits;
pub mod udp;

pub use error::{Result, TransportError};
pub use memory::{MemoryReceiver, MemorySender};
pub use traits::{DatagramReceiver, DatagramSender};
pub use udp::{UdpReceiver, UdpSender, MAX_UDP_PAYLOAD};
