//! Wheelchair-passenger call button over a local network.
//!
//! A kiosk at the bus stop watches a physical button; every press sends the
//! route image and a fixed "passenger waiting" message to a receiver in the
//! bus. Delivery is best-effort UDP with no acknowledgment.
//!
//! # Crate Structure
//!
//! - [`transport`]: Datagram transport (UDP, in-memory links)
//! - [`payload`]: Channel kinds, ports and bounded payload types
//! - [`kiosk`]: Button monitor and transmitter (behind `kiosk` feature)
//! - [`depot`]: Receiver and image artifact (behind `depot` feature)

/// Re-export transport types.
pub mod transport {
    pub use buscall_transport::*;
}

/// Re-export payload types.
pub mod payload {
    pub use buscall_payload::*;
}

/// Re-export kiosk types (requires `kiosk` feature).
#[cfg(feature = "kiosk")]
pub mod kiosk {
    pub use buscall_kiosk::*;
}

/// Re-export depot types (requires `depot` feature).
#[cfg(feature = "depot")]
pub mod depot {
    pub use buscall_depot::*;
}
