use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Component, Path, PathBuf};

use buscall_payload::MAX_DATAGRAM_SIZE;
use bytes::Bytes;
use tracing::debug;

use crate::error::StoreError;

/// Looks up the image blob for a route identifier.
pub trait ImageStore {
    /// Load the image for `route`.
    ///
    /// Implementations may stop reading just past [`MAX_DATAGRAM_SIZE`]; the
    /// transmitter only needs to know that the blob is oversize.
    fn load(&self, route: &str) -> Result<Bytes, StoreError>;
}

/// Images stored as files under one directory.
///
/// A route resolves to `<root>/<route>` when that file exists. A bare bus
/// number (`0`..=`9999`) also resolves to the capture layout
/// `<root>/<n>/<n>.jpg`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Resolve `route` to the file that would be loaded.
    pub fn resolve(&self, route: &str) -> Result<PathBuf, StoreError> {
        validate_route(route)?;

        let direct = self.root.join(route);
        if direct.is_file() {
            return Ok(direct);
        }

        if let Some(bus) = bus_number(route) {
            let capture = self.root.join(&bus).join(format!("{bus}.jpg"));
            if capture.is_file() {
                return Ok(capture);
            }
        }

        Err(StoreError::NotFound {
            route: route.to_string(),
            path: direct,
        })
    }
}

impl ImageStore for DirectoryStore {
    fn load(&self, route: &str) -> Result<Bytes, StoreError> {
        let path = self.resolve(route)?;
        let file = File::open(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => StoreError::NotFound {
                route: route.to_string(),
                path: path.clone(),
            },
            _ => StoreError::Io {
                path: path.clone(),
                source,
            },
        })?;

        let mut blob = Vec::new();
        file.take(MAX_DATAGRAM_SIZE as u64 + 1)
            .read_to_end(&mut blob)
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        debug!(route, path = %path.display(), bytes = blob.len(), "loaded image");
        Ok(Bytes::from(blob))
    }
}

/// A route must be one plain file name: no separators, `.` or `..`.
pub fn validate_route(route: &str) -> Result<(), StoreError> {
    let mut components = Path::new(route).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(StoreError::InvalidRoute(route.to_string())),
    }
}

/// Normalize a bus number the way the capture tool names its folders.
fn bus_number(route: &str) -> Option<String> {
    if route.is_empty() || route.len() > 4 || !route.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    route.parse::<u16>().ok().map(|n| n.to_string())
}
