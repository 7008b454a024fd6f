use std::path::PathBuf;

/// Errors that can occur on the kiosk side.
#[derive(Debug, thiserror::Error)]
pub enum KioskError {
    /// The digital input line could not be configured or read.
    #[error("digital input {line} unavailable: {source}")]
    Input {
        line: String,
        source: std::io::Error,
    },

    /// Image lookup failed.
    #[error("image store error: {0}")]
    Store(#[from] StoreError),

    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] buscall_transport::TransportError),

    /// Payload construction failed.
    #[error("payload error: {0}")]
    Payload(#[from] buscall_payload::PayloadError),
}

/// Errors raised while looking up the image for a route.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No image exists for the route.
    #[error("no image for route {route:?} (looked at {})", path.display())]
    NotFound { route: String, path: PathBuf },

    /// The route identifier cannot name a file inside the store.
    #[error("invalid route identifier {0:?}")]
    InvalidRoute(String),

    /// The image exists but could not be read.
    #[error("failed reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, KioskError>;
