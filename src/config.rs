/// Application configuration
///
/// Everything here comes from in-code defaults. Nothing is read from or
/// written to disk; the app keeps no state between runs.

use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::pdf::ExportOptions;

/// Extensions offered by the image picker (all decodable by the `image` crate)
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp", "ico", "tga", "pnm",
];

/// Default JPEG quality used for each embedded page
const DEFAULT_JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Initial window width in logical pixels
    pub window_width: f32,
    /// Initial window height in logical pixels
    pub window_height: f32,
    /// Edge length of the square thumbnail box in the grid
    pub thumbnail_size: u16,
    /// JPEG quality (1-100) for the page images inside the PDF
    pub jpeg_quality: u8,
    /// Prefix of the suggested output file name
    pub output_prefix: String,
    /// Directory the image picker opens in
    pub default_pick_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: 900.0,
            window_height: 650.0,
            thumbnail_size: 150,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            output_prefix: "ImagesToPDF".to_string(),
            default_pick_dir: dirs::picture_dir().or_else(dirs::home_dir),
        }
    }
}

impl AppConfig {
    /// Suggested file name for the save dialog, e.g. `ImagesToPDF_20240305_140709.pdf`
    pub fn default_output_name(&self, at: NaiveDateTime) -> String {
        format!("{}_{}.pdf", self.output_prefix, at.format("%Y%m%d_%H%M%S"))
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            jpeg_quality: self.jpeg_quality.clamp(1, 100),
        }
    }
}

/// Append `.pdf` when the chosen save path has no extension at all
///
/// Some platform save dialogs return exactly what was typed.
pub fn ensure_pdf_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("pdf")
    }
}
