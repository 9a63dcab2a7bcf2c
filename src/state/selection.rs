use std::path::PathBuf;

use super::data::ImageRef;
use crate::error::SelectionError;

/// The ordered list of images queued for export.
///
/// Position in the list is page order in the exported PDF.
#[derive(Debug, Default)]
pub struct Selection {
    images: Vec<ImageRef>,
    /// Next id handed out by `add`; ids are never reused within a session
    next_id: u64,
}

impl Selection {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append paths in the order the picker returned them.
    /// Duplicates are kept. Returns how many entries were added.
    pub fn add<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let before = self.images.len();
        for path in paths {
            let id = self.next_id;
            self.next_id += 1;
            self.images.push(ImageRef::new(id, path.into()));
        }
        self.images.len() - before
    }

    /// Remove the entry at `index`, shifting later entries down by one
    pub fn remove(&mut self, index: usize) -> Result<ImageRef, SelectionError> {
        if index >= self.images.len() {
            return Err(SelectionError::IndexOutOfRange {
                index,
                len: self.images.len(),
            });
        }
        Ok(self.images.remove(index))
    }

    /// Relocate the entry at `from` so it ends up at `to`.
    ///
    /// Silently does nothing when `from == to` or either index is out of
    /// range, since drags can be dropped on unexpected targets.
    /// Returns `true` when the order changed.
    pub fn move_image(&mut self, from: usize, to: usize) -> bool {
        let len = self.images.len();
        if from == to || from >= len || to >= len {
            return false;
        }

        let image = self.images.remove(from);
        self.images.insert(to, image);
        true
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&ImageRef> {
        self.images.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRef> {
        self.images.iter()
    }

    /// Current index of the entry with the given id
    pub fn position_of(&self, id: u64) -> Option<usize> {
        self.images.iter().position(|image| image.id() == id)
    }

    /// Snapshot of the ordered paths, handed to the exporter
    pub fn paths(&self) -> Vec<PathBuf> {
        self.images
            .iter()
            .map(|image| image.path().to_path_buf())
            .collect()
    }
}
