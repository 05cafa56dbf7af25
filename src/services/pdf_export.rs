//! One-page PDF with the cropped card images.
//!
//! Landscape A4, front and back side by side at ID-1 proportions.

use crate::error::ExportError;
use crate::models::ocr_result::OcrResult;
use crate::utils::data_url;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

/// A4 landscape in points
const PAGE_WIDTH_PT: i64 = 842;
const PAGE_HEIGHT_PT: i64 = 595;

const IMAGE_WIDTH_MM: f64 = 90.0;
const IMAGE_HEIGHT_MM: f64 = 60.0;
const LEFT_MM: f64 = 10.0;
const TOP_MM: f64 = 20.0;
/// Horizontal distance between the two images' left edges
const PITCH_MM: f64 = 100.0;

fn mm_to_pt(mm: f64) -> i64 {
    (mm * 72.0 / 25.4).round() as i64
}

/// Decoded RGB image ready to embed
struct CardImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl CardImage {
    fn from_data_url(url: &str) -> Result<Self, ExportError> {
        let decoded = data_url::decode(url).map_err(ExportError::Decode)?;
        let image = image::load_from_memory(&decoded.bytes)
            .map_err(|e| ExportError::Decode(e.to_string()))?
            .to_rgb8();

        Ok(Self {
            width: image.width(),
            height: image.height(),
            rgb: image.into_raw(),
        })
    }

    fn into_xobject(self) -> Stream {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(self.width),
            "Height" => i64::from(self.height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        Stream::new(dict, self.rgb)
    }
}

/// Render the cropped images of `result` into PDF bytes
pub fn render(result: &OcrResult) -> Result<Vec<u8>, ExportError> {
    if !result.has_cropped_images() {
        return Err(ExportError::NoImages);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut xobjects = Dictionary::new();
    let mut operations = Vec::new();
    let mut x_mm = LEFT_MM;

    let images = [&result.front_cropped_image, &result.back_cropped_image];
    for (index, url) in images.into_iter().enumerate() {
        let Some(url) = url else {
            continue;
        };

        let image = CardImage::from_data_url(url)?;
        let name = format!("Im{}", index + 1);
        let image_id = doc.add_object(image.into_xobject());
        xobjects.set(name.as_bytes().to_vec(), image_id);

        operations.extend(place_image(&name, x_mm));
        // Only a front image pushes the back one to the right
        x_mm += PITCH_MM;
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! { "XObject" => xobjects },
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH_PT.into(), PAGE_HEIGHT_PT.into()],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = info(&mut doc);
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    tracing::info!(bytes = bytes.len(), "Card PDF rendered");
    Ok(bytes)
}

/// Render and write the PDF to `path`
pub fn export_to_file(result: &OcrResult, path: &Path) -> Result<(), ExportError> {
    let bytes = render(result)?;
    std::fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), "Card PDF saved");
    Ok(())
}

/// Draw `name` at `x_mm` from the left, top margin from the top
fn place_image(name: &str, x_mm: f64) -> Vec<Operation> {
    let width = mm_to_pt(IMAGE_WIDTH_MM);
    let height = mm_to_pt(IMAGE_HEIGHT_MM);
    let x = mm_to_pt(x_mm);
    // PDF origin is bottom-left
    let y = PAGE_HEIGHT_PT - mm_to_pt(TOP_MM) - height;

    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                Object::Integer(width),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(height),
                Object::Integer(x),
                Object::Integer(y),
            ],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

fn info(doc: &mut Document) -> ObjectId {
    let created = chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string();
    doc.add_object(dictionary! {
        "Title" => Object::string_literal("Kimlik"),
        "Producer" => Object::string_literal("Kimlik OCR"),
        "CreationDate" => Object::string_literal(created),
    })
}
