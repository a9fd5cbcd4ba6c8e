#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, Stream};
use zebra_strip::constants::GEOMETRY_EPSILON_PT;

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() <= GEOMETRY_EPSILON_PT,
        "expected {} ± {}, got {}",
        expected,
        GEOMETRY_EPSILON_PT,
        actual
    );
}

/// Geometry of a single-page test document
#[derive(Default)]
pub struct TestPage {
    pub media_box: [i64; 4],
    pub crop_box: Option<[i64; 4]>,
    pub rotate: Option<i64>,
}

impl TestPage {
    pub fn sized(width: i64, height: i64) -> Self {
        Self {
            media_box: [0, 0, width, height],
            ..Default::default()
        }
    }
}

fn rect(values: [i64; 4]) -> Object {
    Object::Array(values.iter().map(|v| Object::Integer(*v)).collect())
}

pub fn create_test_pdf(page: &TestPage) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let content_id = doc.add_object(Stream::new(
        Dictionary::new(),
        b"q 0 0 m 100 100 l S Q".to_vec(),
    ));

    let mut page_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        ("MediaBox", rect(page.media_box)),
        ("Resources", Object::Dictionary(Dictionary::new())),
        ("Contents", Object::Reference(content_id)),
    ]);
    if let Some(crop) = page.crop_box {
        page_dict.set("CropBox", rect(crop));
    }
    if let Some(rotate) = page.rotate {
        page_dict.set("Rotate", Object::Integer(rotate));
    }
    let page_id = doc.add_object(page_dict);

    // Create pages dict
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    // Create catalog
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

/// Append a blank page with its own MediaBox to the page tree
pub fn append_page(doc: &mut Document, media_box: [i64; 4]) {
    let pages_id = doc
        .catalog()
        .unwrap()
        .get(b"Pages")
        .unwrap()
        .as_reference()
        .unwrap();
    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        ("MediaBox", rect(media_box)),
        ("Resources", Object::Dictionary(Dictionary::new())),
    ]));

    let pages = doc.get_dictionary_mut(pages_id).unwrap();
    let count = pages.get(b"Count").unwrap().as_i64().unwrap();
    pages.set("Count", Object::Integer(count + 1));
    pages
        .get_mut(b"Kids")
        .unwrap()
        .as_array_mut()
        .unwrap()
        .push(Object::Reference(page_id));
}

pub fn save_bytes(doc: &mut Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub fn pdf_bytes(page: &TestPage) -> Vec<u8> {
    save_bytes(&mut create_test_pdf(page))
}

/// Read a rectangle array as four floats
pub fn read_numbers(obj: &Object) -> Vec<f32> {
    obj.as_array()
        .unwrap()
        .iter()
        .map(|v| match v {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r,
            other => panic!("not a number: {:?}", other),
        })
        .collect()
}

pub fn stream_content(stream: &Stream) -> Vec<u8> {
    if stream.dict.has(b"Filter") {
        stream.decompressed_content().unwrap()
    } else {
        stream.content.clone()
    }
}
