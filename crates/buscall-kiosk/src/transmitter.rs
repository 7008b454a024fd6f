use buscall_payload::{EndpointConfig, ImagePayload, TextPayload, MAX_DATAGRAM_SIZE};
use buscall_transport::{DatagramSender, UdpSender};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::store::{validate_route, ImageStore};

/// What a transmitter sends on every trigger.
#[derive(Debug, Clone)]
pub struct TransmitterConfig {
    /// Key into the image store, fixed at process start.
    pub route: String,
    /// Text sent after the image.
    pub message: TextPayload,
}

impl TransmitterConfig {
    /// Check `route` and `message` so bad settings fail before the first press.
    pub fn new(route: impl Into<String>, message: impl Into<Bytes>) -> Result<Self> {
        let route = route.into();
        validate_route(&route)?;
        let message = TextPayload::new(message)?;
        Ok(Self { route, message })
    }

    /// Send the image for `route` followed by the waiting-passenger message.
    pub fn for_route(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            message: TextPayload::waiting(),
        }
    }
}

/// Result of one channel's send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChannelOutcome {
    /// The datagram was handed to the network layer.
    Sent { bytes: usize },
    /// Nothing was sent; there was nothing valid to send.
    Skipped { reason: String },
    /// The network layer refused the datagram.
    Failed { reason: String },
}

impl ChannelOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, ChannelOutcome::Sent { .. })
    }
}

/// What one transmission handed to the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransmitReport {
    pub route: String,
    pub image: ChannelOutcome,
    pub text: ChannelOutcome,
}

/// Sends the route image and the status message, one datagram each.
///
/// Nothing is acknowledged. A missing image or a refused send on one
/// channel is logged and never stops the other channel.
pub struct Transmitter<S, I, T> {
    store: S,
    image: I,
    text: T,
    config: TransmitterConfig,
}

impl<S: ImageStore> Transmitter<S, UdpSender, UdpSender> {
    /// Transmit over UDP to `endpoints` from one shared local socket.
    pub fn udp(store: S, endpoints: &EndpointConfig, config: TransmitterConfig) -> Result<Self> {
        let image = UdpSender::bind(endpoints.image.addr)?;
        let text = image.with_target(endpoints.text.addr)?;
        info!(
            image = %endpoints.image,
            text = %endpoints.text,
            route = %config.route,
            "transmitter ready"
        );
        Ok(Self::new(store, image, text, config))
    }
}

impl<S, I, T> Transmitter<S, I, T>
where
    S: ImageStore,
    I: DatagramSender,
    T: DatagramSender,
{
    pub fn new(store: S, image: I, text: T, config: TransmitterConfig) -> Self {
        Self {
            store,
            image,
            text,
            config,
        }
    }

    pub fn route(&self) -> &str {
        &self.config.route
    }

    /// Send the image, then the message.
    pub fn transmit(&self) -> TransmitReport {
        let image = self.send_image();
        let text = self.send_text();
        TransmitReport {
            route: self.config.route.clone(),
            image,
            text,
        }
    }

    fn send_image(&self) -> ChannelOutcome {
        let route = self.route();
        let blob = match self.store.load(route) {
            Ok(blob) => blob,
            Err(err) => {
                warn!(route, %err, "image unavailable; sending message only");
                return ChannelOutcome::Skipped {
                    reason: err.to_string(),
                };
            }
        };

        let payload = match ImagePayload::truncating(blob) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(route, %err, "image not sendable; sending message only");
                return ChannelOutcome::Skipped {
                    reason: err.to_string(),
                };
            }
        };
        if payload.truncated_by() > 0 {
            warn!(
                route,
                max = MAX_DATAGRAM_SIZE,
                "image exceeds datagram capacity; truncating"
            );
        }

        match self.image.send(payload.as_bytes()) {
            Ok(bytes) => {
                info!(route, bytes, dest = %self.image.target(), "sent image");
                ChannelOutcome::Sent { bytes }
            }
            Err(err) => {
                warn!(route, %err, "image send failed");
                ChannelOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn send_text(&self) -> ChannelOutcome {
        match self.text.send(self.config.message.as_bytes()) {
            Ok(bytes) => {
                info!(bytes, dest = %self.text.target(), "sent message");
                ChannelOutcome::Sent { bytes }
            }
            Err(err) => {
                warn!(%err, "message send failed");
                ChannelOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
