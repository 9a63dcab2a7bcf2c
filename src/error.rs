/// Error types shared by the selection store and the PDF exporter
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the image selection store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("index {index} is out of range for a selection of {len} images")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors raised while exporting the selection to a PDF
///
/// Cloneable so a result can travel inside an iced message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("no images selected")]
    EmptySelection,

    #[error("could not read image {}: {reason}", .path.display())]
    ImageDecode { path: PathBuf, reason: String },

    #[error("could not write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    #[error("export worker stopped unexpectedly: {0}")]
    Worker(String),
}
