//! The two datagram channels and their well-known ports.
//!
//! Nothing on the wire says what a datagram carries; the port it arrives on
//! is the only type information.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::Serialize;

/// Port carrying raw image datagrams.
pub const IMAGE_PORT: u16 = 2000;

/// Port carrying text status messages.
pub const TEXT_PORT: u16 = 2001;

/// Receiver address the kiosk sends to unless configured otherwise.
pub const DEFAULT_RECEIVER_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 20));

/// Which payload a channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Image,
    Text,
}

impl ChannelKind {
    /// The well-known port for this channel.
    pub fn default_port(self) -> u16 {
        match self {
            ChannelKind::Image => IMAGE_PORT,
            ChannelKind::Text => TEXT_PORT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChannelKind::Image => "image",
            ChannelKind::Text => "text",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where one kind of payload is sent to or received on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelEndpoint {
    pub kind: ChannelKind,
    pub addr: SocketAddr,
}

impl ChannelEndpoint {
    pub fn new(kind: ChannelKind, ip: IpAddr, port: u16) -> Self {
        Self {
            kind,
            addr: SocketAddr::new(ip, port),
        }
    }
}

impl fmt::Display for ChannelEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} channel at {}", self.kind, self.addr)
    }
}

/// The image/text endpoint pair, fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointConfig {
    pub image: ChannelEndpoint,
    pub text: ChannelEndpoint,
}

impl EndpointConfig {
    /// Both channels on one host, using the given ports.
    pub fn for_host(ip: IpAddr, image_port: u16, text_port: u16) -> Self {
        Self {
            image: ChannelEndpoint::new(ChannelKind::Image, ip, image_port),
            text: ChannelEndpoint::new(ChannelKind::Text, ip, text_port),
        }
    }

    /// Wildcard endpoints on the well-known ports, as the receiver binds them.
    pub fn wildcard() -> Self {
        Self::for_host(IpAddr::V4(Ipv4Addr::UNSPECIFIED), IMAGE_PORT, TEXT_PORT)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::for_host(DEFAULT_RECEIVER_ADDR, IMAGE_PORT, TEXT_PORT)
    }
}
