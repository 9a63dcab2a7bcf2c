use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, RgbImage};
use std::path::{Path, PathBuf};
use tokio::task;

use super::writer::{self, PageImage};
use crate::error::ExportError;

/// Knobs for the export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// JPEG quality (1-100) of the embedded page images
    pub jpeg_quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { jpeg_quality: 95 }
    }
}

/// Export the images, in order, as one PDF at `output`
///
/// Runs on the tokio blocking pool because decoding and encoding
/// are CPU and disk bound.
pub async fn export_in_background(
    images: Vec<PathBuf>,
    output: PathBuf,
    options: ExportOptions,
) -> Result<PathBuf, ExportError> {
    task::spawn_blocking(move || export(&images, &output, &options))
        .await
        .map_err(|e| ExportError::Worker(e.to_string()))?
}

/// Export the images, in order, as one PDF at `output`
///
/// Page 1 is `images[0]`. Every image is decoded and normalized before
/// anything touches the disk, so a bad file aborts the export without
/// creating `output`.
pub fn export(
    images: &[PathBuf],
    output: &Path,
    options: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    if images.is_empty() {
        return Err(ExportError::EmptySelection);
    }

    log::info!(
        "📄 Exporting {} images to {}",
        images.len(),
        output.display()
    );

    let pages = images
        .iter()
        .map(|path| load_page(path, options.jpeg_quality))
        .collect::<Result<Vec<_>, _>>()?;

    let mut document =
        writer::build_document(pages).map_err(|e| writer::write_failure(output, e))?;
    writer::save_atomically(&mut document, output)?;

    log::info!("✅ Exported {} pages", images.len());
    Ok(output.to_path_buf())
}

/// Open, normalize and encode one page
fn load_page(path: &Path, jpeg_quality: u8) -> Result<PageImage, ExportError> {
    let decode_failure = |reason: String| ExportError::ImageDecode {
        path: path.to_path_buf(),
        reason,
    };

    // Sniff the format from content so misnamed files still load
    let decoded = ImageReader::open(path)
        .map_err(|e| decode_failure(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_failure(e.to_string()))?
        .decode()
        .map_err(|e| decode_failure(e.to_string()))?;

    let rgb = normalize(decoded);
    log::debug!(
        "page {}: {}x{}",
        path.display(),
        rgb.width(),
        rgb.height()
    );

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, jpeg_quality)
        .encode_image(&rgb)
        .map_err(|e| decode_failure(e.to_string()))?;

    Ok(PageImage {
        width: rgb.width(),
        height: rgb.height(),
        jpeg,
    })
}

/// Convert any color model to 8-bit RGB. Alpha is dropped, not composited.
pub fn normalize(image: DynamicImage) -> RgbImage {
    image.into_rgb8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma, Rgb, Rgba, RgbaImage};
    use lopdf::Document;

    /// Pixel sizes of each page's MediaBox, in page order
    fn page_sizes(pdf: &Path) -> Vec<(i64, i64)> {
        let doc = Document::load(pdf).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let media_box = doc
                    .get_dictionary(page_id)
                    .unwrap()
                    .get(b"MediaBox")
                    .unwrap()
                    .as_array()
                    .unwrap();
                (
                    media_box[2].as_i64().unwrap(),
                    media_box[3].as_i64().unwrap(),
                )
            })
            .collect()
    }

    fn write_rgb(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(width, height, Rgb([200, 40, 40]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_export_keeps_page_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_rgb(dir.path(), "A.png", 12, 8);
        let b = write_rgb(dir.path(), "B.png", 20, 10);
        let c = write_rgb(dir.path(), "C.jpg", 6, 30);
        let output = dir.path().join("album.pdf");

        let written = export(&[b, c, a], &output, &ExportOptions::default()).unwrap();

        assert_eq!(written, output);
        assert_eq!(page_sizes(&output), vec![(20, 10), (6, 30), (12, 8)]);
    }

    #[test]
    fn test_export_single_image() {
        let dir = tempfile::tempdir().unwrap();
        let b = write_rgb(dir.path(), "B.png", 16, 9);
        let output = dir.path().join("single.pdf");

        export(&[b], &output, &ExportOptions::default()).unwrap();

        assert_eq!(page_sizes(&output), vec![(16, 9)]);
    }

    #[test]
    fn test_export_normalizes_gray_and_alpha() {
        let dir = tempfile::tempdir().unwrap();

        let gray = dir.path().join("gray.png");
        GrayImage::from_pixel(5, 5, Luma([128])).save(&gray).unwrap();

        let transparent = dir.path().join("alpha.png");
        RgbaImage::from_pixel(7, 3, Rgba([10, 20, 30, 0]))
            .save(&transparent)
            .unwrap();

        let output = dir.path().join("mixed.pdf");
        export(&[gray, transparent], &output, &ExportOptions::default()).unwrap();

        assert_eq!(page_sizes(&output), vec![(5, 5), (7, 3)]);
    }

    #[test]
    fn test_export_normalizes_sixteen_bit_and_palette() {
        let dir = tempfile::tempdir().unwrap();

        let deep = dir.path().join("deep.png");
        ImageBuffer::<Rgb<u16>, Vec<u16>>::from_pixel(9, 4, Rgb([60000, 1000, 30000]))
            .save(&deep)
            .unwrap();

        // GIF frames are always written with a colour table
        let palette = dir.path().join("palette.gif");
        RgbaImage::from_fn(5, 6, |x, _| {
            if x % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
        .save(&palette)
        .unwrap();

        let output = dir.path().join("formats.pdf");
        export(&[deep, palette], &output, &ExportOptions::default()).unwrap();

        assert_eq!(page_sizes(&output), vec![(9, 4), (5, 6)]);
    }

    #[test]
    fn test_normalize_drops_alpha() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0]));
        let rgb = normalize(DynamicImage::ImageRgba8(rgba));

        assert_eq!(rgb.get_pixel(1, 1), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_export_sniffs_misnamed_file() {
        let dir = tempfile::tempdir().unwrap();
        let png = write_rgb(dir.path(), "real.png", 4, 4);
        let misnamed = dir.path().join("photo.jpg");
        std::fs::rename(&png, &misnamed).unwrap();
        let output = dir.path().join("out.pdf");

        export(&[misnamed], &output, &ExportOptions::default()).unwrap();

        assert_eq!(page_sizes(&output), vec![(4, 4)]);
    }

    #[test]
    fn test_export_empty_selection() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("empty.pdf");

        let result = export(&[], &output, &ExportOptions::default());

        assert_eq!(result, Err(ExportError::EmptySelection));
        assert!(!output.exists());
    }

    #[test]
    fn test_corrupt_image_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_rgb(dir.path(), "first.png", 4, 4);
        let broken = dir.path().join("broken.png");
        std::fs::write(&broken, b"definitely not an image").unwrap();
        let third = write_rgb(dir.path(), "third.png", 4, 4);
        let output = dir.path().join("out.pdf");

        let error = export(
            &[first, broken.clone(), third],
            &output,
            &ExportOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(error, ExportError::ImageDecode { ref path, .. } if path == &broken));
        assert!(!output.exists());

        // No temporary leftovers either
        let pdfs_or_parts = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                name.ends_with(".pdf") || name.ends_with(".part")
            })
            .count();
        assert_eq!(pdfs_or_parts, 0);
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.png");
        let output = dir.path().join("out.pdf");

        let error = export(&[missing.clone()], &output, &ExportOptions::default()).unwrap_err();

        assert!(matches!(error, ExportError::ImageDecode { ref path, .. } if path == &missing));
        assert!(!output.exists());
    }

    #[test]
    fn test_existing_output_survives_failed_export() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("keep.pdf");
        std::fs::write(&output, b"previous export").unwrap();
        let broken = dir.path().join("broken.gif");
        std::fs::write(&broken, b"GIF89a but not really").unwrap();

        assert!(export(&[broken], &output, &ExportOptions::default()).is_err());
        assert_eq!(std::fs::read(&output).unwrap(), b"previous export");
    }

    #[tokio::test]
    async fn test_export_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_rgb(dir.path(), "a.png", 3, 2);
        let output = dir.path().join("bg.pdf");

        let written = export_in_background(vec![a], output.clone(), ExportOptions::default())
            .await
            .unwrap();

        assert_eq!(written, output);
        assert_eq!(page_sizes(&output), vec![(3, 2)]);
    }

    #[tokio::test]
    async fn test_export_in_background_empty() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("bg.pdf");

        let result =
            export_in_background(Vec::new(), output.clone(), ExportOptions::default()).await;

        assert_eq!(result, Err(ExportError::EmptySelection));
        assert!(!output.exists());
    }
}
