// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixture PDFs for unit tests. Each page draws its own label so tests can
// check page order after an operation.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

/// Options for [`build_pdf`].
#[derive(Default)]
pub struct Fixture<'a> {
    pub labels: &'a [&'a str],
    /// Put MediaBox and Resources on the page tree root instead of each page.
    pub inherit_from_root: bool,
    /// `/Rotate` value written on every page.
    pub rotate: Option<i64>,
    /// MediaBox as `[x0 y0 x1 y1]`; defaults to US Letter.
    pub media_box: Option<[i64; 4]>,
    /// Write `/Contents` as a reference to an array of stream references.
    pub indirect_contents_array: bool,
}

pub fn labelled_pdf(labels: &[&str]) -> Vec<u8> {
    build_pdf(&Fixture {
        labels,
        ..Default::default()
    })
}

/// `count` pages labelled `{prefix}{n}`, n starting at 1.
pub fn numbered_pdf(prefix: &str, count: usize) -> Vec<u8> {
    let labels: Vec<String> = (1..=count).map(|n| format!("{prefix}{n}")).collect();
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    labelled_pdf(&refs)
}

pub fn build_pdf(fixture: &Fixture<'_>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let resources_id = doc.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]));
    let media_box = Object::Array(
        fixture
            .media_box
            .unwrap_or([0, 0, 612, 792])
            .iter()
            .map(|v| Object::Integer(*v))
            .collect(),
    );

    let mut kids = Vec::new();
    for label in fixture.labels {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
                Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(label.as_bytes().to_vec(), StringFormat::Literal)],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let mut content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
        if fixture.indirect_contents_array {
            content_id = doc.add_object(Object::Array(vec![Object::Reference(content_id)]));
        }

        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        if !fixture.inherit_from_root {
            page.set("MediaBox", media_box.clone());
            page.set("Resources", Object::Reference(resources_id));
        }
        if let Some(rotate) = fixture.rotate {
            page.set("Rotate", Object::Integer(rotate));
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(kids.len() as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    if fixture.inherit_from_root {
        pages.set("MediaBox", media_box);
        pages.set("Resources", Object::Reference(resources_id));
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// Label drawn on each page, in page order.
pub fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|page_id| {
            let content = doc.get_page_content(*page_id).unwrap();
            let text = String::from_utf8_lossy(&content).into_owned();
            let start = text.find('(').map(|i| i + 1).unwrap_or(0);
            let end = text[start..].find(')').map(|i| start + i).unwrap_or(start);
            text[start..end].to_string()
        })
        .collect()
}

/// Page dictionaries in page order.
pub fn page_dicts(bytes: &[u8]) -> (Document, Vec<lopdf::ObjectId>) {
    let doc = Document::load_mem(bytes).unwrap();
    let ids = doc.get_pages().values().copied().collect();
    (doc, ids)
}

pub fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes).unwrap().get_pages().len()
}

/// A small solid-colour image encoded in `format`.
pub fn tiny_image(width: u32, height: u32, format: ::image::ImageFormat) -> Vec<u8> {
    let img = ::image::RgbImage::from_pixel(width, height, ::image::Rgb([200, 30, 30]));
    let mut out = std::io::Cursor::new(Vec::new());
    ::image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, format)
        .unwrap();
    out.into_inner()
}
