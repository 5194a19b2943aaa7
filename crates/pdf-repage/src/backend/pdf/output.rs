use super::xobject::create_page_xobject;
use crate::geometry::Matrix;
use crate::types::{PageRef, RepageError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// A page composed but not yet written into the page tree
#[derive(Debug, Default)]
struct PendingPage {
    width: f32,
    height: f32,
    content: String,
    xobjects: Dictionary,
}

/// Output document under construction.
///
/// Pages are collected first and the page tree is built by [`finalize`],
/// so the same output can receive pages in any order of drawing calls.
///
/// [`finalize`]: LopdfOutput::finalize
#[derive(Debug)]
pub struct LopdfOutput {
    doc: Document,
    pages: Vec<PendingPage>,
    /// Form XObject per drawn source page
    forms: HashMap<PageRef, ObjectId>,
    /// Per source document: copied object ids
    copies: HashMap<usize, HashMap<ObjectId, ObjectId>>,
}

impl Default for LopdfOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl LopdfOutput {
    pub fn new() -> Self {
        Self {
            doc: Document::with_version("1.7"),
            pages: Vec::new(),
            forms: HashMap::new(),
            copies: HashMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub(crate) fn push_page(&mut self, width: f32, height: f32) -> usize {
        self.pages.push(PendingPage {
            width,
            height,
            ..PendingPage::default()
        });
        self.pages.len() - 1
    }

    /// Form XObject for a source page, created on first use
    pub(crate) fn form_for(
        &mut self,
        page: PageRef,
        source_index: usize,
        source: &Document,
        page_id: ObjectId,
    ) -> Result<ObjectId> {
        if let Some(&id) = self.forms.get(&page) {
            return Ok(id);
        }
        let cache = self.copies.entry(source_index).or_default();
        let id = create_page_xobject(&mut self.doc, source, page_id, cache)?;
        self.forms.insert(page, id);
        Ok(id)
    }

    pub(crate) fn add_object(&mut self, object: impl Into<Object>) -> ObjectId {
        self.doc.add_object(object)
    }

    /// Paint an XObject on a pending page with the given matrix
    pub(crate) fn place(&mut self, index: usize, xobject: ObjectId, matrix: &Matrix) -> Result<()> {
        let count = self.pages.len();
        let page = self
            .pages
            .get_mut(index)
            .ok_or(RepageError::InvalidPosition {
                position: index,
                len: count,
            })?;

        let name = format!("X{}", page.xobjects.len());
        page.content.push_str(&format!(
            "q {} {} {} {} {} {} cm /{} Do Q\n",
            matrix[0], matrix[1], matrix[2], matrix[3], matrix[4], matrix[5], name
        ));
        page.xobjects.set(name.as_bytes(), Object::Reference(xobject));
        Ok(())
    }

    /// Build the page tree and catalog
    pub fn finalize(self) -> Document {
        let Self { mut doc, pages, .. } = self;
        let pages_tree_id = doc.new_object_id();

        let mut page_refs = Vec::with_capacity(pages.len());
        for page in pages {
            let content_id = doc.add_object(Stream::new(Dictionary::new(), page.content.into_bytes()));
            let page_id = doc.add_object(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_tree_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(page.width),
                        Object::Real(page.height),
                    ]),
                ),
                ("Contents", Object::Reference(content_id)),
                (
                    "Resources",
                    Object::Dictionary(Dictionary::from_iter(vec![(
                        "XObject",
                        Object::Dictionary(page.xobjects),
                    )])),
                ),
            ]));
            page_refs.push(Object::Reference(page_id));
        }

        let count = page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(page_refs)),
            ("Count", Object::Integer(count)),
        ]);
        doc.objects
            .insert(pages_tree_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_tree_id)),
        ]));
        doc.trailer.set("Root", catalog_id);

        doc
    }
}
