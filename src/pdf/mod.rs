/// PDF export module
///
/// This module handles:
/// - Decoding the selected images and normalizing them to RGB (exporter.rs)
/// - Assembling the multi-page document and saving it atomically (writer.rs)

pub mod exporter;
pub mod writer;

pub use exporter::{export_in_background, ExportOptions};
