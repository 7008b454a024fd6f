use std::net::SocketAddr;

/// Errors that can occur in datagram transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// The network layer refused a datagram.
    #[error("failed to send datagram to {target}: {source}")]
    Send {
        target: String,
        source: std::io::Error,
    },

    /// Failed to receive a pending datagram.
    #[error("failed to receive datagram: {0}")]
    Receive(std::io::Error),

    /// An I/O error occurred while configuring a socket.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The datagram exceeds the link's maximum size.
    #[error("datagram too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, TransportError>;
