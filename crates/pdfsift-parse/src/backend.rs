//! PDF parsing backend trait.
//!
//! [`PdfBackend`] is the seam between the page model in `pdfsift` and the
//! library that actually reads PDF files.

use crate::error::BackendError;
use crate::handler::ContentHandler;
use crate::page_geometry::PdfBox;

/// Operations the page model needs from a PDF reader.
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// let page = MyBackend::get_page(&doc, 0)?;
/// let media_box = MyBackend::page_media_box(&doc, &page)?;
/// MyBackend::interpret_page(&doc, &page, &mut handler)?;
/// ```
pub trait PdfBackend {
    type Document;
    type Page;
    type Error: std::error::Error + Into<BackendError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable PDF or the document
    /// is encrypted.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// The page's /MediaBox, inherited from the page tree if needed.
    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<PdfBox, Self::Error>;

    /// The page's /CropBox, if any.
    fn page_crop_box(doc: &Self::Document, page: &Self::Page)
    -> Result<Option<PdfBox>, Self::Error>;

    /// The page's /Rotate in degrees, 0 if absent.
    fn page_rotate(doc: &Self::Document, page: &Self::Page) -> Result<i32, Self::Error>;

    /// Run the content stream interpreter over the page.
    ///
    /// # Errors
    ///
    /// Returns an error if the content stream cannot be decoded or parsed.
    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
    ) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{CharEvent, CollectingHandler};

    struct MockBackend;

    struct MockDocument {
        pages: Vec<&'static str>,
    }

    impl PdfBackend for MockBackend {
        type Document = MockDocument;
        type Page = usize;
        type Error = BackendError;

        fn open(bytes: &[u8]) -> Result<MockDocument, BackendError> {
            if bytes.is_empty() {
                return Err(BackendError::Parse("empty input".to_string()));
            }
            Ok(MockDocument {
                pages: vec!["A", "B"],
            })
        }

        fn page_count(doc: &MockDocument) -> usize {
            doc.pages.len()
        }

        fn get_page(doc: &MockDocument, index: usize) -> Result<usize, BackendError> {
            if index < doc.pages.len() {
                Ok(index)
            } else {
                Err(BackendError::Parse(format!("page {index} out of range")))
            }
        }

        fn page_media_box(_doc: &MockDocument, _page: &usize) -> Result<PdfBox, BackendError> {
            Ok(PdfBox::new(0.0, 0.0, 612.0, 792.0))
        }

        fn page_crop_box(
            _doc: &MockDocument,
            _page: &usize,
        ) -> Result<Option<PdfBox>, BackendError> {
            Ok(None)
        }

        fn page_rotate(_doc: &MockDocument, _page: &usize) -> Result<i32, BackendError> {
            Ok(0)
        }

        fn interpret_page(
            doc: &MockDocument,
            page: &usize,
            handler: &mut dyn ContentHandler,
        ) -> Result<(), BackendError> {
            let text = doc.pages[*page];
            handler.on_char(CharEvent {
                char_code: u32::from(text.as_bytes()[0]),
                unicode: Some(text.to_string()),
                font_name: "Mock".to_string(),
                font_size: 12.0,
                text_matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
                ctm: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
                displacement: 600.0,
                h_scaling: 1.0,
                rise: 0.0,
                ascent: 750.0,
                descent: -250.0,
            });
            Ok(())
        }
    }

    #[test]
    fn mock_backend_round_trip() {
        let doc = MockBackend::open(b"%PDF").unwrap();
        assert_eq!(MockBackend::page_count(&doc), 2);
        let page = MockBackend::get_page(&doc, 1).unwrap();
        let mut handler = CollectingHandler::default();
        MockBackend::interpret_page(&doc, &page, &mut handler).unwrap();
        assert_eq!(handler.chars[0].unicode.as_deref(), Some("B"));
    }

    #[test]
    fn mock_backend_errors() {
        assert!(MockBackend::open(b"").is_err());
        let doc = MockBackend::open(b"%PDF").unwrap();
        assert!(MockBackend::get_page(&doc, 2).is_err());
    }
}
