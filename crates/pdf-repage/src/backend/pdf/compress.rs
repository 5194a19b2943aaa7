//! Lossy re-compression of embedded images

use crate::options::CompressionSettings;
use crate::types::*;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Downscale and re-encode oversized images as JPEG.
///
/// Only images wider or taller than `max_side` are touched. Encodings we
/// cannot decode are left as they are. Returns the number of images replaced.
pub fn recompress_images(doc: &mut Document, settings: &CompressionSettings) -> Result<usize> {
    let candidates: Vec<ObjectId> = doc
        .objects
        .iter()
        .filter_map(|(id, obj)| match obj {
            Object::Stream(stream) if is_oversized_image(&stream.dict, settings.max_side) => {
                Some(*id)
            }
            _ => None,
        })
        .collect();

    let mut replaced = 0;
    for id in candidates {
        let Some(Object::Stream(stream)) = doc.objects.get_mut(&id) else {
            continue;
        };
        let Some(image) = decode_image(stream)? else {
            log::debug!("Skipping image {:?}: unsupported encoding", id);
            continue;
        };

        let scaled = image.resize(settings.max_side, settings.max_side, FilterType::Lanczos3);
        let rgb = DynamicImage::ImageRgb8(scaled.to_rgb8());
        let mut jpeg = Vec::new();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, settings.quality))?;

        let dict = &mut stream.dict;
        dict.set("Width", Object::Integer(rgb.width() as i64));
        dict.set("Height", Object::Integer(rgb.height() as i64));
        dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
        dict.set("BitsPerComponent", Object::Integer(8));
        dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
        dict.remove(b"DecodeParms");
        dict.remove(b"Decode");
        stream.set_content(jpeg);
        stream.allows_compression = false;
        replaced += 1;
    }

    log::info!("Re-compressed {} image(s)", replaced);
    Ok(replaced)
}

fn is_oversized_image(dict: &Dictionary, max_side: u32) -> bool {
    let is_image = matches!(dict.get(b"Subtype"), Ok(Object::Name(name)) if name.as_slice() == b"Image");
    if !is_image || dict.get(b"ImageMask").is_ok_and(|m| matches!(m, Object::Boolean(true))) {
        return false;
    }
    let side = |key: &[u8]| dict.get(key).and_then(Object::as_i64).unwrap_or(0);
    side(b"Width") > max_side as i64 || side(b"Height") > max_side as i64
}

/// Single filter name of a stream, `Some(None)` when unfiltered
fn single_filter(dict: &Dictionary) -> Option<Option<Vec<u8>>> {
    match dict.get(b"Filter") {
        Err(_) => Some(None),
        Ok(Object::Name(name)) => Some(Some(name.clone())),
        Ok(Object::Array(filters)) => match filters.as_slice() {
            [] => Some(None),
            [Object::Name(name)] => Some(Some(name.clone())),
            _ => None,
        },
        Ok(_) => None,
    }
}

fn decode_image(stream: &Stream) -> Result<Option<DynamicImage>> {
    let Some(filter) = single_filter(&stream.dict) else {
        return Ok(None);
    };

    match filter.as_deref() {
        Some(b"DCTDecode") => {
            let image = image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg)?;
            Ok(Some(image))
        }
        Some(b"FlateDecode") => match stream.decompressed_content() {
            Ok(samples) => Ok(raw_image(&stream.dict, samples)),
            Err(_) => Ok(None),
        },
        None => Ok(raw_image(&stream.dict, stream.content.clone())),
        Some(_) => Ok(None),
    }
}

/// 8-bit RGB or gray samples with a device colour space
fn raw_image(dict: &Dictionary, samples: Vec<u8>) -> Option<DynamicImage> {
    let width = u32::try_from(dict.get(b"Width").and_then(Object::as_i64).ok()?).ok()?;
    let height = u32::try_from(dict.get(b"Height").and_then(Object::as_i64).ok()?).ok()?;
    if dict.get(b"BitsPerComponent").and_then(Object::as_i64).ok()? != 8 {
        return None;
    }

    match dict.get(b"ColorSpace").ok()? {
        Object::Name(name) if name.as_slice() == b"DeviceRGB" => {
            RgbImage::from_raw(width, height, samples).map(DynamicImage::ImageRgb8)
        }
        Object::Name(name) if name.as_slice() == b"DeviceGray" => {
            GrayImage::from_raw(width, height, samples).map(DynamicImage::ImageLuma8)
        }
        _ => None,
    }
}
