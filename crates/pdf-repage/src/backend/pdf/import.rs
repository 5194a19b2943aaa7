//! Loading input files as lopdf documents
//!
//! PDFs are parsed directly. Raster images become a one-page document at
//! 1 pixel per point.

use super::output::LopdfOutput;
use crate::types::*;
use image::{ColorType, DynamicImage, ImageFormat};
use lopdf::{Dictionary, Document, Object, Stream};
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "gif"];

pub fn load_document(path: &Path) -> Result<Document> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => {
            let bytes = std::fs::read(path)?;
            Ok(Document::load_mem(&bytes)?)
        }
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => {
            let bytes = std::fs::read(path)?;
            image_document(bytes)
        }
        _ => Err(RepageError::UnsupportedFormat(path.to_owned())),
    }
}

/// Wrap an encoded image into a single-page document
pub fn image_document(bytes: Vec<u8>) -> Result<Document> {
    let format = image::guess_format(&bytes)?;
    let image = image::load_from_memory_with_format(&bytes, format)?;
    let (width, height) = (image.width(), image.height());

    let mut output = LopdfOutput::new();
    let stream = match (format, image.color()) {
        (ImageFormat::Jpeg, ColorType::Rgb8) => jpeg_stream(bytes, width, height, b"DeviceRGB"),
        (ImageFormat::Jpeg, ColorType::L8) => jpeg_stream(bytes, width, height, b"DeviceGray"),
        _ => {
            let mut stream = raw_rgb_stream(&image);
            if image.color().has_alpha() {
                let mask = output.add_object(alpha_mask_stream(&image));
                stream.dict.set("SMask", Object::Reference(mask));
            }
            stream
        }
    };

    let image_id = output.add_object(stream);
    let (w, h) = (width as f32, height as f32);
    let page = output.push_page(w, h);
    output.place(page, image_id, &[w, 0.0, 0.0, h, 0.0, 0.0])?;

    log::debug!("Converted {:?} image ({}x{}) to a PDF page", format, width, height);
    Ok(output.finalize())
}

fn image_dict(width: u32, height: u32, color_space: &[u8]) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(width as i64)),
        ("Height", Object::Integer(height as i64)),
        ("ColorSpace", Object::Name(color_space.to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
    ])
}

/// JPEG data is embedded as-is
fn jpeg_stream(bytes: Vec<u8>, width: u32, height: u32, color_space: &[u8]) -> Stream {
    let mut dict = image_dict(width, height, color_space);
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
    Stream::new(dict, bytes).with_compression(false)
}

/// Raw RGB samples, deflated when the document is compressed
fn raw_rgb_stream(image: &DynamicImage) -> Stream {
    let rgb = image.to_rgb8();
    Stream::new(image_dict(rgb.width(), rgb.height(), b"DeviceRGB"), rgb.into_raw())
}

fn alpha_mask_stream(image: &DynamicImage) -> Stream {
    let alpha: Vec<u8> = image.to_rgba8().pixels().map(|p| p.0[3]).collect();
    Stream::new(image_dict(image.width(), image.height(), b"DeviceGray"), alpha)
}
