//! Fixture PDFs for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::{Document, Object, Stream, dictionary};

/// One string drawn with Helvetica 12 at baseline `(x, y)` in PDF space.
pub struct TextRun<'a> {
    pub text: &'a str,
    pub x: f64,
    pub y: f64,
}

pub fn run(text: &str, x: f64, y: f64) -> TextRun<'_> {
    TextRun { text, x, y }
}

/// Build a US Letter PDF with one content stream per page.
pub fn pdf_bytes(pages: &[Vec<TextRun<'_>>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for runs in pages {
        let mut content = String::new();
        for r in runs {
            content.push_str(&format!(
                "BT /F1 12 Tf {} {} Td ({}) Tj ET\n",
                r.x, r.y, r.text
            ));
        }
        let stream = Stream::new(lopdf::Dictionary::new(), content.into_bytes());
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => [0, 0, 612, 792].map(Object::Integer).to_vec(),
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
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
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub fn write_pdf(dir: &Path, name: &str, pages: &[Vec<TextRun<'_>>]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_bytes(pages)).unwrap();
    path
}

/// Two pages: page 1 has "ACME Corp" near the top and "Total 99.00" just
/// below it; page 2 has "Other Co" in the same spot.
///
/// With a 792pt page and Helvetica 12, a baseline at y=760 puts the glyph
/// boxes at top 23 to bottom 35; a baseline at y=730 puts them at 53 to 65.
pub fn acme_pages() -> Vec<Vec<TextRun<'static>>> {
    vec![
        vec![run("ACME Corp", 10.0, 760.0), run("Total 99.00", 10.0, 730.0)],
        vec![run("Other Co", 10.0, 760.0), run("Total 12.00", 10.0, 730.0)],
    ]
}

/// Template JSON in the authoring tool's shape.
pub const ACME_TEMPLATES: &str = r#"{
  "documents": [
    {
      "document_name": "AcmeInvoice",
      "criteria_sets": [
        {"criteria": "ACME", "criteria_box": {"x": 0, "y": 0, "width": 200, "height": 50}}
      ],
      "entities": [
        {"name": "Total", "coordinates": {"x": 0, "y": 50, "width": 200, "height": 20}}
      ]
    }
  ]
}"#;
