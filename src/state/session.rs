use std::path::{Path, PathBuf};

use super::data::ImageRef;
use super::drag::ReorderController;
use super::selection::Selection;
use crate::error::{ExportError, SelectionError};

/// Where the export flow currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportPhase {
    /// Export available (when there is something to export)
    #[default]
    Ready,
    /// Export running in the background, controls disabled
    Exporting,
    /// Last export failed; export is available again
    Failed,
}

impl ExportPhase {
    pub fn is_exporting(self) -> bool {
        self == ExportPhase::Exporting
    }
}

/// Session-scoped state owned by the application.
///
/// The selection, the drag state and the export phase live here and are
/// only mutated through these methods, one UI message at a time.
#[derive(Debug, Default)]
pub struct Session {
    selection: Selection,
    reorder: ReorderController,
    phase: ExportPhase,
    status: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn reorder(&self) -> &ReorderController {
        &self.reorder
    }

    pub fn export_phase(&self) -> ExportPhase {
        self.phase
    }

    /// Status line shown under the grid
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn add_images<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let added = self.selection.add(paths);
        log::info!(
            "added {} images ({} selected)",
            added,
            self.selection.len()
        );
        added
    }

    pub fn remove_image(&mut self, index: usize) -> Result<ImageRef, SelectionError> {
        // Indices shift on removal; an in-flight drag would point at the wrong tile
        self.reorder.on_drag_end();

        match self.selection.remove(index) {
            Ok(image) => {
                log::info!("removed {}", image.path().display());
                Ok(image)
            }
            Err(error) => {
                log::error!("remove failed: {error}");
                self.status = format!("Error: {error}");
                Err(error)
            }
        }
    }

    pub fn clear(&mut self) {
        self.reorder.on_drag_end();
        self.selection.clear();
        log::info!("selection cleared");
    }

    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.selection.position_of(id)
    }

    pub fn on_drag_start(&mut self, index: usize) {
        self.reorder.on_drag_start(index);
    }

    pub fn on_drag_over(&mut self, target: usize) -> bool {
        self.reorder.on_drag_over(target)
    }

    pub fn on_drag_leave(&mut self, target: usize) {
        self.reorder.on_drag_leave(target);
    }

    pub fn on_drop(&mut self, target: usize) -> bool {
        self.reorder.on_drop(&mut self.selection, target)
    }

    pub fn on_drag_end(&mut self) {
        self.reorder.on_drag_end();
    }

    pub fn can_export(&self) -> bool {
        !self.selection.is_empty() && !self.phase.is_exporting()
    }

    /// Enter the exporting phase and hand out the ordered paths to export.
    /// Returns `None` when there is nothing to export or an export is running.
    pub fn begin_export(&mut self) -> Option<Vec<PathBuf>> {
        if !self.can_export() {
            return None;
        }

        self.phase = ExportPhase::Exporting;
        self.status = "Converting images to PDF...".to_string();
        log::info!("exporting {} images", self.selection.len());
        Some(self.selection.paths())
    }

    /// Leave the exporting phase, whatever the outcome
    pub fn finish_export(&mut self, result: Result<PathBuf, ExportError>) {
        match result {
            Ok(path) => {
                log::info!("✅ PDF written to {}", path.display());
                self.phase = ExportPhase::Ready;
                self.status = format!("PDF created successfully: {}", file_name(&path));
            }
            Err(error) => {
                log::warn!("export failed: {error}");
                self.phase = ExportPhase::Failed;
                self.status = format!("Error saving PDF: {error}");
            }
        }
    }

    /// Save dialog dismissed before anything started
    pub fn cancel_export(&mut self) {
        log::info!("export cancelled");
        self.status = "Export cancelled".to_string();
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
