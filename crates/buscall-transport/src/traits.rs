use crate::error::Result;

/// The sending half of one datagram channel.
///
/// A sender is bound to a single destination for its whole lifetime. Every
/// call to [`send`](DatagramSender::send) hands exactly one datagram to the
/// network layer; nothing is acknowledged and nothing is retried.
pub trait DatagramSender {
    /// Send `payload` as a single datagram.
    ///
    /// Returns the number of bytes handed to the network layer. `Ok` only
    /// means the local stack accepted the datagram, not that it arrived.
    fn send(&self, payload: &[u8]) -> Result<usize>;

    /// Human-readable destination for diagnostics.
    fn target(&self) -> String;
}

/// The receiving half of one datagram channel.
pub trait DatagramReceiver {
    /// Take one pending datagram without blocking.
    ///
    /// Returns `Ok(None)` when nothing is pending. A datagram larger than
    /// `buf` is truncated to `buf.len()` bytes; the remainder is discarded.
    fn try_recv(&self, buf: &mut [u8]) -> Result<Option<usize>>;
}

impl<T: DatagramSender + ?Sized> DatagramSender for Box<T> {
    fn send(&self, payload: &[u8]) -> Result<usize> {
        (**self).send(payload)
    }

    fn target(&self) -> String {
        (**self).target()
    }
}

impl<T: DatagramReceiver + ?Sized> DatagramReceiver for Box<T> {
    fn try_recv(&self, buf: &mut [u8]) -> Result<Option<usize>> {
        (**self).try_recv(buf)
    }
}
