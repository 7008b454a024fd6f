use crate::channel::ChannelKind;

/// Errors raised when building a payload for one channel.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The payload exceeds the channel buffer capacity.
    #[error("{kind} payload too large ({size} bytes, max {max})")]
    TooLarge {
        kind: ChannelKind,
        size: usize,
        max: usize,
    },

    /// Zero-length payloads carry nothing and are never sent.
    #[error("{0} payload is empty")]
    Empty(ChannelKind),
}

pub type Result<T> = std::result::Result<T, PayloadError>;
