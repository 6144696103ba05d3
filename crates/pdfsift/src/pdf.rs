//! Opened PDF documents.

use std::path::Path;

use pdfsift_core::{Char, TextOptions};
use pdfsift_parse::{
    CollectingHandler, LopdfBackend, LopdfDocument, PageGeometry, PdfBackend, char_from_event,
};

use crate::error::PdfError;
use crate::page::Page;

/// An open PDF document.
///
/// ```ignore
/// let pdf = Pdf::open_file("statement.pdf")?;
/// let page = pdf.page(0)?;
/// println!("{}", page.extract_text());
/// ```
#[derive(Debug)]
pub struct Pdf {
    doc: LopdfDocument,
    text_options: TextOptions,
}

impl Pdf {
    /// Parse a document from bytes.
    ///
    /// # Errors
    ///
    /// [`PdfError::PasswordRequired`] for encrypted documents, or
    /// [`PdfError::Backend`] if the bytes are not a readable PDF.
    pub fn open(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = LopdfBackend::open(bytes)?;
        Ok(Self {
            doc,
            text_options: TextOptions::default(),
        })
    }

    /// Read and parse a document from disk.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| PdfError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::open(&bytes)
    }

    /// Tolerances handed to every page this document loads.
    pub fn with_text_options(mut self, options: TextOptions) -> Self {
        self.text_options = options;
        self
    }

    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    /// Load the page at 0-based `index` and position its characters.
    ///
    /// # Errors
    ///
    /// Fails if the index is out of range or the page content cannot be
    /// decoded or interpreted.
    pub fn page(&self, index: usize) -> Result<Page, PdfError> {
        let count = self.page_count();
        if index >= count {
            return Err(PdfError::PageOutOfRange { page: index, count });
        }

        let page = LopdfBackend::get_page(&self.doc, index)?;
        let media_box = LopdfBackend::page_media_box(&self.doc, &page)?;
        let crop_box = LopdfBackend::page_crop_box(&self.doc, &page)?;
        let rotation = LopdfBackend::page_rotate(&self.doc, &page)?;
        let geometry = PageGeometry::new(media_box, crop_box, rotation);

        let mut handler = CollectingHandler::default();
        LopdfBackend::interpret_page(&self.doc, &page, &mut handler)?;

        let chars: Vec<Char> = handler
            .chars
            .iter()
            .map(|event| char_from_event(event, &geometry))
            .collect();

        Ok(Page::new(index, geometry.width(), geometry.height(), chars)
            .with_rotation(geometry.rotation())
            .with_text_options(self.text_options))
    }

    /// Iterate over every page in order, loading each lazily.
    pub fn pages(&self) -> impl Iterator<Item = Result<Page, PdfError>> + '_ {
        (0..self.page_count()).map(move |i| self.page(i))
    }
}
