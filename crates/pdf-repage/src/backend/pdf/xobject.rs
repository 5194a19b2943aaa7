//! Source pages as Form XObjects
//!
//! Each source page is wrapped once per output document into a Form XObject
//! carrying the page's content and resources. Output pages then draw it with
//! a placement matrix.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::geometry::Rect;
use crate::types::{Result, Rotation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Page tree depth beyond which inherited lookups give up
const MAX_INHERIT_DEPTH: usize = 32;

// =============================================================================
// XObject Creation
// =============================================================================

/// Wrap a source page into a Form XObject inside `output`.
///
/// `cache` maps source object ids to their copies in `output`, so resources
/// shared by several pages of one source are copied once.
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;
    let media_box = page_box(source, page_id);
    let content_data = get_page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set(
        "BBox",
        Object::Array(vec![
            Object::Real(media_box.x),
            Object::Real(media_box.y),
            Object::Real(media_box.right()),
            Object::Real(media_box.top()),
        ]),
    );
    xobject_dict.set("FormType", Object::Integer(1));

    if let Some(resources) = inherited_attribute(source, page_id, b"Resources") {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, &resources, cache)?,
        );
    }

    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

// =============================================================================
// Page Attributes
// =============================================================================

/// Look up a page attribute, walking up `/Parent` for inheritable keys
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = page_id;
    for _ in 0..MAX_INHERIT_DEPTH {
        let dict = doc.get_dictionary(current).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

/// Effective page box, falling back to US Letter
pub fn page_box(doc: &Document, page_id: ObjectId) -> Rect {
    inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| rect_from_array(&obj))
        .unwrap_or_else(|| {
            Rect::new(0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1)
        })
}

/// Intrinsic `/Rotate` of a page; values that are not quarter turns count as 0
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> Rotation {
    inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_i64().ok())
        .and_then(|degrees| Rotation::from_degrees(degrees as i32))
        .unwrap_or_default()
}

fn resolve(doc: &Document, obj: Object) -> Option<Object> {
    match obj {
        Object::Reference(id) => doc.get_object(id).ok().cloned(),
        other => Some(other),
    }
}

/// Normalised rectangle from a `[llx lly urx ury]` array
fn rect_from_array(obj: &Object) -> Option<Rect> {
    let values = obj.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }
    let x1 = extract_number(&values[0])?;
    let y1 = extract_number(&values[1])?;
    let x2 = extract_number(&values[2])?;
    let y2 = extract_number(&values[3])?;
    let rect = Rect::new(x1.min(x2), y1.min(y2), (x2 - x1).abs(), (y2 - y1).abs());
    (rect.width > 0.0 && rect.height > 0.0).then_some(rect)
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Get the content stream data from a page.
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(parts) => get_concatenated_content_streams(doc, parts),
            Object::Stream(stream) => Ok(stream_data(stream)),
            _ => Ok(Vec::new()),
        },
        Object::Array(parts) => get_concatenated_content_streams(doc, parts),
        _ => Ok(Vec::new()),
    }
}

fn stream_data(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

/// Concatenate multiple content streams
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        if let Object::Reference(id) = obj {
            if let Ok(stream) = doc.get_object(*id)?.as_stream() {
                result.extend_from_slice(&stream_data(stream));
                result.push(b'\n');
            }
        }
    }

    Ok(result)
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// `/Parent` links are skipped so copying a resource never drags the source
/// page tree along.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            // Reserve the id first so reference cycles terminate
            let new_id = output.new_object_id();
            cache.insert(*id, new_id);
            let copied = match source.get_object(*id) {
                Ok(referenced) => copy_object_deep(output, source, referenced, cache)?,
                Err(_) => Object::Null,
            };
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        if key.as_slice() == b"Parent" {
            continue;
        }
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_inherited_box() -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
        ]));
        doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(vec![Object::Reference(page_id)])),
                ("Count", Object::Integer(1)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(595),
                        Object::Integer(842),
                    ]),
                ),
                ("Rotate", Object::Integer(-90)),
            ])),
        );
        (doc, page_id)
    }

    #[test]
    fn test_media_box_inherited_from_parent() {
        let (doc, page_id) = doc_with_inherited_box();
        assert_eq!(page_box(&doc, page_id), Rect::new(0.0, 0.0, 595.0, 842.0));
        assert_eq!(page_rotation(&doc, page_id), Rotation::Clockwise270);
    }

    #[test]
    fn test_missing_media_box_defaults_to_letter() {
        let mut doc = Document::with_version("1.7");
        let page_id = doc.add_object(Dictionary::from_iter(vec![(
            "Type",
            Object::Name(b"Page".to_vec()),
        )]));
        assert_eq!(page_box(&doc, page_id), Rect::new(0.0, 0.0, 612.0, 792.0));
        assert_eq!(page_rotation(&doc, page_id), Rotation::None);
    }

    #[test]
    fn test_copy_skips_parent_and_survives_cycles() {
        let mut source = Document::with_version("1.7");
        let a = source.new_object_id();
        let b = source.add_object(Dictionary::from_iter(vec![("Next", Object::Reference(a))]));
        source.objects.insert(
            a,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Next", Object::Reference(b)),
                ("Parent", Object::Reference(b)),
            ])),
        );

        let mut output = Document::with_version("1.7");
        let mut cache = HashMap::new();
        let copied = copy_object_deep(&mut output, &source, &Object::Reference(a), &mut cache).unwrap();

        let new_a = copied.as_reference().unwrap();
        let dict = output.get_dictionary(new_a).unwrap();
        assert!(dict.get(b"Parent").is_err());
        assert_eq!(output.objects.len(), 2);
    }
}
