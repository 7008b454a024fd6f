use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use buscall_payload::{ChannelKind, EndpointConfig, MAX_DATAGRAM_SIZE, MAX_TEXT_SIZE};
use buscall_transport::{DatagramReceiver, UdpReceiver};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::artifact::{ImageArtifact, DEFAULT_ARTIFACT};
use crate::error::Result;

/// Where images go and how long to idle between empty polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverConfig {
    /// File overwritten with every received image.
    pub artifact: PathBuf,
    /// Sleep after a poll that found nothing on either channel. Default: 100 ms.
    pub idle_sleep: Duration,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            artifact: PathBuf::from(DEFAULT_ARTIFACT),
            idle_sleep: Duration::from_millis(100),
        }
    }
}

/// Something the receiver did with one datagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReceiveEvent {
    /// An image replaced the artifact.
    ImageStored { bytes: usize, path: PathBuf },
    /// An image arrived but the artifact could not be written.
    ImageDropped { bytes: usize, reason: String },
    /// A text message arrived.
    Message { text: String },
}

impl ReceiveEvent {
    pub fn channel(&self) -> ChannelKind {
        match self {
            ReceiveEvent::ImageStored { .. } | ReceiveEvent::ImageDropped { .. } => {
                ChannelKind::Image
            }
            ReceiveEvent::Message { .. } => ChannelKind::Text,
        }
    }
}

/// Listens on the image and text channels and keeps the latest of each.
///
/// There is no session state: every datagram is handled on its own. Each
/// poll checks the image channel first, then the text channel.
pub struct Receiver<I, T> {
    image: I,
    text: T,
    artifact: ImageArtifact,
    idle_sleep: Duration,
    image_buf: Vec<u8>,
    text_buf: Vec<u8>,
}

impl Receiver<UdpReceiver, UdpReceiver> {
    /// Bind both UDP channels. Failure to bind either is fatal.
    pub fn bind(endpoints: &EndpointConfig, config: ReceiverConfig) -> Result<Self> {
        let image = UdpReceiver::bind(endpoints.image.addr)?;
        let text = UdpReceiver::bind(endpoints.text.addr)?;
        Ok(Self::new(image, text, config))
    }

    /// Bound addresses of the image and text channels.
    pub fn local_addrs(&self) -> (std::net::SocketAddr, std::net::SocketAddr) {
        (self.image.local_addr(), self.text.local_addr())
    }
}

impl<I: DatagramReceiver, T: DatagramReceiver> Receiver<I, T> {
    pub fn new(image: I, text: T, config: ReceiverConfig) -> Self {
        Self {
            image,
            text,
            artifact: ImageArtifact::new(config.artifact),
            idle_sleep: config.idle_sleep,
            image_buf: vec![0u8; MAX_DATAGRAM_SIZE],
            text_buf: vec![0u8; MAX_TEXT_SIZE],
        }
    }

    pub fn artifact_path(&self) -> &Path {
        self.artifact.path()
    }

    /// Check the image channel, then the text channel, without blocking.
    ///
    /// Returns what was handled; an empty list means nothing was pending.
    /// A receive error on one channel is logged and skips only that channel.
    pub fn poll_once(&mut self) -> Vec<ReceiveEvent> {
        let mut events = Vec::new();

        if let Some(event) = self.poll_image() {
            events.push(event);
        }
        if let Some(event) = self.poll_text() {
            events.push(event);
        }

        events
    }

    /// Poll until `running` is cleared or `on_event` breaks.
    ///
    /// Sleeps for the idle interval whenever a poll finds nothing. Returns
    /// the number of events handled.
    pub fn run<F>(&mut self, running: &AtomicBool, mut on_event: F) -> u64
    where
        F: FnMut(&ReceiveEvent) -> ControlFlow<()>,
    {
        info!(artifact = %self.artifact.path().display(), "receiver listening");
        let mut handled = 0u64;

        while running.load(Ordering::SeqCst) {
            let events = self.poll_once();
            if events.is_empty() {
                if !self.idle_sleep.is_zero() {
                    std::thread::sleep(self.idle_sleep);
                }
                continue;
            }

            for event in &events {
                handled += 1;
                if on_event(event).is_break() {
                    return handled;
                }
            }
        }

        handled
    }

    fn poll_image(&mut self) -> Option<ReceiveEvent> {
        let len = match self.image.try_recv(&mut self.image_buf) {
            Ok(Some(0)) => {
                debug!("ignoring empty image datagram");
                return None;
            }
            Ok(Some(len)) => len,
            Ok(None) => return None,
            Err(err) => {
                warn!(channel = %ChannelKind::Image, %err, "receive failed; skipping channel");
                return None;
            }
        };

        let event = match self.artifact.store(&self.image_buf[..len]) {
            Ok(()) => {
                info!(bytes = len, path = %self.artifact.path().display(), "image received");
                ReceiveEvent::ImageStored {
                    bytes: len,
                    path: self.artifact.path().to_path_buf(),
                }
            }
            Err(err) => {
                warn!(bytes = len, %err, "dropping image");
                ReceiveEvent::ImageDropped {
                    bytes: len,
                    reason: err.to_string(),
                }
            }
        };
        Some(event)
    }

    fn poll_text(&mut self) -> Option<ReceiveEvent> {
        let len = match self.text.try_recv(&mut self.text_buf) {
            Ok(Some(0)) => {
                debug!("ignoring empty text datagram");
                return None;
            }
            Ok(Some(len)) => len,
            Ok(None) => return None,
            Err(err) => {
                warn!(channel = %ChannelKind::Text, %err, "receive failed; skipping channel");
                return None;
            }
        };

        let text = message_text(&self.text_buf[..len]);
        info!(message = %text, "message received");
        Some(ReceiveEvent::Message { text })
    }
}

/// Decode a text datagram up to its first NUL; invalid UTF-8 is replaced.
fn message_text(datagram: &[u8]) -> String {
    let end = datagram
        .iter()
        .position(|b| *b == 0)
        .unwrap_or(datagram.len());
    String::from_utf8_lossy(&datagram[..end]).into_owned()
}
