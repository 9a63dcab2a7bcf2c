/// PDF assembly and atomic save
///
/// Every page is a single JPEG image XObject painted over the whole page.
/// Page size in points equals the image size in pixels (72 dpi).

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::fmt::Display;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ExportError;

/// Name of the image resource on each page
const IMAGE_RESOURCE: &str = "Im0";

/// One encoded page, ready to be embedded
#[derive(Debug, Clone)]
pub struct PageImage {
    pub width: u32,
    pub height: u32,
    /// Baseline JPEG bytes of an 8-bit RGB raster
    pub jpeg: Vec<u8>,
}

/// Build a document with one page per image, in order
pub fn build_document(pages: Vec<PageImage>) -> lopdf::Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let width = i64::from(page.width);
        let height = i64::from(page.height);

        // Already DCT-compressed; lopdf must not deflate it again
        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            page.jpeg,
        )
        .with_compression(false);
        let image_id = doc.add_object(image);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        0.into(),
                        0.into(),
                        height.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_RESOURCE => image_id,
                },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Producer" => Object::string_literal(concat!("images-to-pdf ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    Ok(doc)
}

/// Write `doc` to `output` without ever leaving a partial file there.
///
/// The bytes go to a temporary file next to `output`, which is renamed
/// over `output` only once fully written and synced. On any error the
/// temporary file is dropped (and deleted).
pub fn save_atomically(doc: &mut Document, output: &Path) -> Result<(), ExportError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staging = tempfile::Builder::new()
        .prefix(".images-to-pdf-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| write_failure(output, e))?;

    {
        let mut writer = BufWriter::new(staging.as_file_mut());
        doc.save_to(&mut writer)
            .map_err(|e| write_failure(output, e))?;
        writer.flush().map_err(|e| write_failure(output, e))?;
    }
    staging
        .as_file()
        .sync_all()
        .map_err(|e| write_failure(output, e))?;

    staging
        .persist(output)
        .map_err(|e| write_failure(output, e.error))?;

    Ok(())
}

pub fn write_failure(output: &Path, error: impl Display) -> ExportError {
    ExportError::Write {
        path: output.to_path_buf(),
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_page(width: u32, height: u32) -> PageImage {
        // Content is opaque to the writer; it only embeds the bytes
        PageImage {
            width,
            height,
            jpeg: vec![0xFF, 0xD8, 0xFF, 0xD9],
        }
    }

    fn media_box(doc: &Document, page_id: lopdf::ObjectId) -> Vec<i64> {
        doc.get_dictionary(page_id)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|value| value.as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_pages_follow_input_order() {
        let doc = build_document(vec![blank_page(10, 20), blank_page(30, 40)]).unwrap();

        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(media_box(&doc, pages[&1]), vec![0, 0, 10, 20]);
        assert_eq!(media_box(&doc, pages[&2]), vec![0, 0, 30, 40]);
    }

    #[test]
    fn test_save_atomically_writes_only_target() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pdf");
        let mut doc = build_document(vec![blank_page(4, 4)]).unwrap();

        save_atomically(&mut doc, &output).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("out.pdf")]);

        let reloaded = Document::load(&output).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }

    #[test]
    fn test_save_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing").join("out.pdf");
        let mut doc = build_document(vec![blank_page(4, 4)]).unwrap();

        let error = save_atomically(&mut doc, &output).unwrap_err();

        assert!(matches!(error, ExportError::Write { ref path, .. } if path == &output));
        assert!(!output.exists());
    }
}
