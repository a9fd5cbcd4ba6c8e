//! Form XObjects wrapping the strip content
//!
//! The source page (or image) becomes a Form XObject whose BBox is the
//! effective bounds, which is then placed on the strip with a single
//! transformation. The BBox does the cropping.

use crate::layout::Rect;
use crate::source::page_attribute;
use crate::types::{Result, StripError};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Wrap a source page in a Form XObject clipped to `bbox`.
///
/// # Arguments
/// * `output` - The strip document receiving the form
/// * `source` - The document the page belongs to
/// * `page_id` - The page to reproduce
/// * `bbox` - Visible region in the page's raw coordinates
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    bbox: &Rect,
) -> Result<ObjectId> {
    let content = page_content(source, page_id)?;
    let mut form = form_dictionary(bbox);

    // Resources may be inherited from the page tree
    if let Some(resources) = page_attribute(source, page_id, b"Resources")? {
        let resources = ResourceCopier::new(output, source).copy(resources)?;
        form.set("Resources", resources);
    }

    Ok(output.add_object(Stream::new(form, content)))
}

/// Form XObject that paints image `image_id` over `media_box`, clipped to `bbox`.
pub fn create_image_form(
    output: &mut Document,
    image_id: ObjectId,
    media_box: &Rect,
    bbox: &Rect,
) -> ObjectId {
    let mut xobjects = Dictionary::new();
    xobjects.set("Im0", Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut form = form_dictionary(bbox);
    form.set("Resources", Object::Dictionary(resources));

    // Image space is the unit square; stretch it over the raw pixel grid
    let content = format!(
        "q {} 0 0 {} {} {} cm /Im0 Do Q\n",
        media_box.width, media_box.height, media_box.x, media_box.y
    );

    output.add_object(Stream::new(form, content.into_bytes()))
}

fn form_dictionary(bbox: &Rect) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Form".to_vec())),
        ("FormType", Object::Integer(1)),
        (
            "BBox",
            Object::Array(
                [bbox.x, bbox.y, bbox.right(), bbox.top()]
                    .into_iter()
                    .map(Object::Real)
                    .collect(),
            ),
        ),
    ])
}

// =============================================================================
// Page Content
// =============================================================================

/// Decoded page content, all content streams joined in order.
///
/// A page without `/Contents` is blank and yields no bytes.
fn page_content(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>> {
    let page = doc.get_dictionary(page_id)?;
    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };

    let mut streams = Vec::new();
    collect_streams(doc, contents, &mut streams)?;

    let mut content = Vec::new();
    for stream in streams {
        content.extend_from_slice(&stream_bytes(stream)?);
        content.push(b'\n');
    }
    Ok(content)
}

/// `/Contents` is a stream, an array of streams, or a reference to either.
fn collect_streams<'a>(doc: &'a Document, obj: &'a Object, out: &mut Vec<&'a Stream>) -> Result<()> {
    match obj {
        Object::Reference(id) => collect_streams(doc, doc.get_object(*id)?, out),
        Object::Stream(stream) => {
            out.push(stream);
            Ok(())
        }
        Object::Array(items) => items
            .iter()
            .try_for_each(|item| collect_streams(doc, item, out)),
        other => Err(StripError::ContentDecode(format!(
            "unexpected page /Contents entry: {:?}",
            other
        ))),
    }
}

/// Unfiltered streams are returned as-is; a filter lopdf cannot decode means
/// the page cannot be reproduced.
fn stream_bytes(stream: &Stream) -> Result<Vec<u8>> {
    if !stream.dict.has(b"Filter") {
        return Ok(stream.content.clone());
    }
    stream
        .decompressed_content()
        .map_err(|e| StripError::ContentDecode(format!("page content stream: {}", e)))
}

// =============================================================================
// Resource Copying
// =============================================================================

/// Copies an object graph from the source document into the strip document.
///
/// Every source object is copied at most once; shared and cyclic references
/// map to the same new object.
struct ResourceCopier<'a> {
    output: &'a mut Document,
    source: &'a Document,
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> ResourceCopier<'a> {
    fn new(output: &'a mut Document, source: &'a Document) -> Self {
        Self {
            output,
            source,
            copied: HashMap::new(),
        }
    }

    fn copy(&mut self, obj: &Object) -> Result<Object> {
        Ok(match obj {
            Object::Reference(id) => Object::Reference(self.copy_reference(*id)?),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(dict)?),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy(item))
                    .collect::<Result<_>>()?,
            ),
            Object::Stream(stream) => {
                // Raw bytes are kept with their filters
                let mut copy = Stream::new(self.copy_dictionary(&stream.dict)?, stream.content.clone());
                copy.allows_compression = stream.allows_compression;
                Object::Stream(copy)
            }
            primitive => primitive.clone(),
        })
    }

    fn copy_reference(&mut self, id: ObjectId) -> Result<ObjectId> {
        if let Some(&new_id) = self.copied.get(&id) {
            return Ok(new_id);
        }

        // Reserve the id first so self-referencing structures terminate
        let new_id = self.output.new_object_id();
        self.copied.insert(id, new_id);

        let source = self.source;
        let copy = self.copy(source.get_object(id)?)?;
        self.output.objects.insert(new_id, copy);
        Ok(new_id)
    }

    fn copy_dictionary(&mut self, dict: &Dictionary) -> Result<Dictionary> {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            copy.set(key.clone(), self.copy(value)?);
        }
        Ok(copy)
    }
}
