use std::io::ErrorKind;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::{DatagramReceiver, DatagramSender};

/// Largest payload a single IPv4 UDP datagram can carry.
pub const MAX_UDP_PAYLOAD: usize = 65_507;

/// UDP sender bound to one fixed destination.
///
/// The local socket is bound to an ephemeral port on the wildcard address of
/// the destination's family. Several senders may share one local socket via
/// [`UdpSender::with_target`].
#[derive(Debug)]
pub struct UdpSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpSender {
    /// Open a socket on an ephemeral local port that sends to `target`.
    pub fn bind(target: SocketAddr) -> Result<Self> {
        let local = match target {
            SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        };
        let socket = UdpSocket::bind(local).map_err(|e| TransportError::Bind {
            addr: local,
            source: e,
        })?;
        debug!(%target, "opened udp sender");
        Ok(Self { socket, target })
    }

    /// Reuse this sender's local socket for a second destination.
    pub fn with_target(&self, target: SocketAddr) -> Result<Self> {
        let socket = self.socket.try_clone()?;
        Ok(Self { socket, target })
    }

    /// The local address datagrams originate from.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(Into::into)
    }
}

impl DatagramSender for UdpSender {
    fn send(&self, payload: &[u8]) -> Result<usize> {
        let sent = self
            .socket
            .send_to(payload, self.target)
            .map_err(|e| TransportError::Send {
                target: self.target.to_string(),
                source: e,
            })?;
        debug!(dest = %self.target, bytes = sent, "sent datagram");
        Ok(sent)
    }

    fn target(&self) -> String {
        self.target.to_string()
    }
}

/// Non-blocking UDP receiver bound to a fixed local address.
///
/// Accepts datagrams from any source.
#[derive(Debug)]
pub struct UdpReceiver {
    socket: UdpSocket,
    local_addr: SocketAddr,
}

impl UdpReceiver {
    /// Bind to `addr` and switch the socket to non-blocking mode.
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(addr).map_err(|e| TransportError::Bind { addr, source: e })?;
        socket
            .set_nonblocking(true)
            .map_err(|e| TransportError::Bind { addr, source: e })?;
        let local_addr = socket.local_addr()?;

        info!(%local_addr, "listening for datagrams");

        Ok(Self { socket, local_addr })
    }

    /// The address this receiver is bound to (resolves ephemeral ports).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl DatagramReceiver for UdpReceiver {
    fn try_recv(&self, buf: &mut [u8]) -> Result<Option<usize>> {
        match self.socket.recv_from(buf) {
            Ok((len, from)) => {
                debug!(local = %self.local_addr, %from, bytes = len, "received datagram");
                Ok(Some(len))
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                Ok(None)
            }
            Err(e) => Err(TransportError::Receive(e)),
        }
    }
}
