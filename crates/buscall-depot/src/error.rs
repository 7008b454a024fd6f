use std::path::PathBuf;

/// Errors that can occur on the depot side.
#[derive(Debug, thiserror::Error)]
pub enum DepotError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] buscall_transport::TransportError),

    /// The image artifact could not be written.
    #[error("failed writing {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DepotError>;
