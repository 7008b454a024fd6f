use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DepotError, Result};

/// File name the receiver writes images to unless configured otherwise.
pub const DEFAULT_ARTIFACT: &str = "received_image.jpg";

/// The single file holding the most recently received image.
///
/// Every store replaces the whole file. Readers racing a store may see a
/// partially written image.
#[derive(Debug, Clone)]
pub struct ImageArtifact {
    path: PathBuf,
}

impl ImageArtifact {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the artifact with exactly `image`.
    pub fn store(&self, image: &[u8]) -> Result<()> {
        std::fs::write(&self.path, image).map_err(|source| DepotError::Artifact {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), bytes = image.len(), "wrote image artifact");
        Ok(())
    }
}

impl Default for ImageArtifact {
    fn default() -> Self {
        Self::new(DEFAULT_ARTIFACT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "buscall-artifact-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir
    }

    #[test]
    fn smaller_image_leaves_no_trailing_bytes() {
        let dir = unique_temp_dir("overwrite");
        let artifact = ImageArtifact::new(dir.join("received.jpg"));

        artifact.store(&[1u8; 1024]).unwrap();
        artifact.store(&[2u8; 10]).unwrap();

        assert_eq!(std::fs::read(artifact.path()).unwrap(), vec![2u8; 10]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unwritable_path_reports_artifact_error() {
        let dir = unique_temp_dir("unwritable");
        let artifact = ImageArtifact::new(dir.join("missing-dir").join("received.jpg"));

        let err = artifact.store(b"img").unwrap_err();
        assert!(matches!(err, DepotError::Artifact { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
