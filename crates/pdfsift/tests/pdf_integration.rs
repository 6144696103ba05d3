mod common;

use common::{acme_pages, pdf_bytes, run};
use pdfsift::{Pdf, PdfError, RegionText};
use pdfsift_core::BBox;

#[test]
fn opens_and_counts_pages() {
    let pdf = Pdf::open(&pdf_bytes(&acme_pages())).unwrap();
    assert_eq!(pdf.page_count(), 2);
    let page = pdf.page(1).unwrap();
    assert_eq!(page.page_number(), 2);
    assert_eq!(page.width(), 612.0);
    assert_eq!(page.height(), 792.0);
}

#[test]
fn char_boxes_are_top_left_origin() {
    let pdf = Pdf::open(&pdf_bytes(&[vec![run("AB", 10.0, 760.0)]])).unwrap();
    let page = pdf.page(0).unwrap();
    let chars = page.chars();
    assert_eq!(chars.len(), 2);
    assert_eq!(chars[0].text, "A");
    assert!((chars[0].bbox.x0 - 10.0).abs() < 1e-6);
    assert!((chars[0].bbox.x1 - 17.2).abs() < 1e-6);
    assert!((chars[0].bbox.top - 23.0).abs() < 1e-6);
    assert!((chars[0].bbox.bottom - 35.0).abs() < 1e-6);
    assert!((chars[1].bbox.x0 - 17.2).abs() < 1e-6);
    assert_eq!(chars[0].fontname, "Helvetica");
}

#[test]
fn region_text_from_real_page() {
    let pdf = Pdf::open(&pdf_bytes(&acme_pages())).unwrap();
    let page = pdf.page(0).unwrap();
    assert_eq!(
        page.region_text(&BBox::new(0.0, 0.0, 200.0, 50.0)).unwrap(),
        "ACME Corp"
    );
    assert_eq!(
        page.region_text(&BBox::new(0.0, 50.0, 200.0, 70.0)).unwrap(),
        "Total 99.00"
    );
    assert_eq!(
        page.region_text(&BBox::new(300.0, 300.0, 400.0, 400.0)).unwrap(),
        ""
    );
    assert_eq!(page.extract_text(), "ACME Corp\nTotal 99.00");
}

#[test]
fn page_out_of_range() {
    let pdf = Pdf::open(&pdf_bytes(&acme_pages())).unwrap();
    let err = pdf.page(2).unwrap_err();
    assert!(matches!(err, PdfError::PageOutOfRange { page: 2, count: 2 }));
}

#[test]
fn corrupt_bytes_fail_to_open() {
    let err = Pdf::open(b"%PDF-1.5 truncated garbage").unwrap_err();
    assert!(matches!(err, PdfError::Backend(_)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Pdf::open_file(dir.path().join("absent.pdf")).unwrap_err();
    assert!(matches!(err, PdfError::Io { .. }));
}

#[test]
fn pages_iterator_visits_all() {
    let pdf = Pdf::open(&pdf_bytes(&acme_pages())).unwrap();
    let texts: Vec<String> = pdf.pages().map(|p| p.unwrap().extract_text()).collect();
    assert_eq!(texts.len(), 2);
    assert!(texts[1].starts_with("Other Co"));
}
