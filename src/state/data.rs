/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the selection store, the exporter and the UI layer.

use std::path::{Path, PathBuf};

/// A single user-selected image in the selection
///
/// Two entries may point at the same file; they stay distinct because
/// each gets its own `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Session-unique identifier, used by the UI to address a tile
    id: u64,
    /// Full path to the image file
    path: PathBuf,
    /// Filename only (e.g., "IMG_0001.jpg")
    display_name: String,
}

impl ImageRef {
    pub fn new(id: u64, path: PathBuf) -> Self {
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Self {
            id,
            path,
            display_name,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}
