use std::borrow::Cow;

use bytes::Bytes;

use crate::channel::ChannelKind;
use crate::error::{PayloadError, Result};

/// Capacity of one channel buffer, and the largest image datagram.
pub const MAX_DATAGRAM_SIZE: usize = 1_000_000;

/// Largest text datagram: buffer capacity minus one terminator byte.
pub const MAX_TEXT_SIZE: usize = MAX_DATAGRAM_SIZE - 1;

/// The fixed message a kiosk sends on every button press
/// ("A wheelchair user is waiting.").
pub const WAITING_MESSAGE: &str = "휠체어 이용객이 대기중입니다.";

/// Raw image bytes for one image datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Bytes,
    original_len: usize,
}

impl ImagePayload {
    /// Wrap `bytes`, rejecting empty or oversize blobs.
    pub fn new(bytes: impl Into<Bytes>) -> Result<Self> {
        let bytes = bytes.into();
        check_len(ChannelKind::Image, bytes.len(), MAX_DATAGRAM_SIZE)?;
        let original_len = bytes.len();
        Ok(Self {
            bytes,
            original_len,
        })
    }

    /// Wrap `bytes`, cutting anything past [`MAX_DATAGRAM_SIZE`].
    ///
    /// Only an empty blob is rejected.
    pub fn truncating(bytes: impl Into<Bytes>) -> Result<Self> {
        let mut bytes = bytes.into();
        if bytes.is_empty() {
            return Err(PayloadError::Empty(ChannelKind::Image));
        }
        let original_len = bytes.len();
        bytes.truncate(MAX_DATAGRAM_SIZE);
        Ok(Self {
            bytes,
            original_len,
        })
    }

    /// Number of bytes cut off by [`ImagePayload::truncating`].
    pub fn truncated_by(&self) -> usize {
        self.original_len - self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A short human-readable status message for one text datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPayload {
    bytes: Bytes,
}

impl TextPayload {
    /// Wrap a message, rejecting empty or oversize text.
    pub fn new(text: impl Into<Bytes>) -> Result<Self> {
        let bytes = text.into();
        check_len(ChannelKind::Text, bytes.len(), MAX_TEXT_SIZE)?;
        Ok(Self { bytes })
    }

    /// The fixed waiting-passenger message.
    pub fn waiting() -> Self {
        Self {
            bytes: Bytes::from_static(WAITING_MESSAGE.as_bytes()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The message as text; invalid UTF-8 is replaced, not rejected.
    pub fn to_text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

fn check_len(kind: ChannelKind, size: usize, max: usize) -> Result<()> {
    if size == 0 {
        return Err(PayloadError::Empty(kind));
    }
    if size > max {
        return Err(PayloadError::TooLarge { kind, size, max });
    }
    Ok(())
}
