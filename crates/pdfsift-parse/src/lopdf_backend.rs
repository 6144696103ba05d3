//! lopdf-based PDF parsing backend.
//!
//! Implements [`PdfBackend`] on top of [`lopdf::Document`]: page lookup,
//! inherited page attributes, content stream decoding, and interpretation.

use std::sync::LazyLock;

use crate::backend::PdfBackend;
use crate::error::BackendError;
use crate::handler::ContentHandler;
use crate::interpreter::interpret_content_stream;
use crate::interpreter_state::InterpreterState;
use crate::page_geometry::{DEFAULT_MEDIA_BOX, PdfBox};
use crate::text_state::TextState;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page object ids in document order.
    page_ids: Vec<lopdf::ObjectId>,
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// A page within a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    pub object_id: lopdf::ObjectId,
    /// 0-based page index.
    pub index: usize,
}

/// The lopdf-based backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

/// Integer or real object as f64.
pub(crate) fn object_to_f64_opt(obj: &lopdf::Object) -> Option<f64> {
    match obj {
        lopdf::Object::Integer(i) => Some(*i as f64),
        lopdf::Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

/// Follow an indirect reference, returning the object itself otherwise.
/// Dangling references resolve to the reference object.
pub(crate) fn resolve_ref<'a>(
    doc: &'a lopdf::Document,
    obj: &'a lopdf::Object,
) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

/// Stream bytes, decompressed when a /Filter is present.
pub(crate) fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

fn pdf_box_from_array(array: &[lopdf::Object]) -> Result<PdfBox, BackendError> {
    let values: Vec<f64> = array.iter().filter_map(object_to_f64_opt).collect();
    match values[..] {
        [x0, y0, x1, y1] if array.len() == 4 => Ok(PdfBox::new(x0, y0, x1, y1)),
        _ => Err(BackendError::Parse(format!(
            "expected a box of 4 numbers, got {} entries",
            array.len()
        ))),
    }
}

/// Look up a page attribute, walking /Parent links for inherited keys.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut current = page_id;
    // Bounded walk; a /Parent cycle must not hang.
    for _ in 0..64 {
        let dict = doc
            .get_object(current)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(resolve_ref(doc, value)));
        }
        match dict.get(b"Parent").and_then(|p| p.as_reference()) {
            Ok(parent) => current = parent,
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Parse("page tree /Parent chain too deep".to_string()))
}

fn page_dict(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> Result<&lopdf::Dictionary, BackendError> {
    doc.get_object(page_id)
        .and_then(|o| o.as_dict())
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))
}

/// Concatenated bytes of the page's /Contents stream or stream array.
fn get_page_content_bytes(
    doc: &lopdf::Document,
    page: &lopdf::Dictionary,
) -> Result<Vec<u8>, BackendError> {
    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };

    let stream_of = |obj: &lopdf::Object| -> Result<Vec<u8>, BackendError> {
        let stream = resolve_ref(doc, obj)
            .as_stream()
            .map_err(|e| BackendError::Parse(format!("/Contents entry is not a stream: {e}")))?;
        decode_stream(stream)
    };

    match resolve_ref(doc, contents) {
        lopdf::Object::Array(parts) => {
            let mut content = Vec::new();
            for part in parts {
                if !content.is_empty() {
                    content.push(b'\n');
                }
                content.extend(stream_of(part)?);
            }
            Ok(content)
        }
        other => stream_of(other),
    }
}

/// The page's /Resources, inherited if needed, or an empty dictionary.
fn get_page_resources(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> Result<&lopdf::Dictionary, BackendError> {
    static EMPTY: LazyLock<lopdf::Dictionary> = LazyLock::new(lopdf::Dictionary::new);

    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => obj
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => Ok(&EMPTY),
    }
}

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<LopdfDocument, BackendError> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::PasswordRequired);
        }

        let page_ids = inner.get_pages().values().copied().collect();
        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &LopdfDocument) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &LopdfDocument, index: usize) -> Result<LopdfPage, BackendError> {
        let object_id = doc.page_ids.get(index).copied().ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                doc.page_ids.len()
            ))
        })?;
        Ok(LopdfPage { object_id, index })
    }

    fn page_media_box(doc: &LopdfDocument, page: &LopdfPage) -> Result<PdfBox, BackendError> {
        match resolve_inherited(&doc.inner, page.object_id, b"MediaBox")? {
            Some(obj) => {
                let array = obj
                    .as_array()
                    .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?;
                pdf_box_from_array(array)
            }
            None => Ok(DEFAULT_MEDIA_BOX),
        }
    }

    fn page_crop_box(
        doc: &LopdfDocument,
        page: &LopdfPage,
    ) -> Result<Option<PdfBox>, BackendError> {
        let crop = resolve_inherited(&doc.inner, page.object_id, b"CropBox")?
            .and_then(|obj| obj.as_array().ok())
            .and_then(|array| pdf_box_from_array(array).ok());
        Ok(crop)
    }

    fn page_rotate(doc: &LopdfDocument, page: &LopdfPage) -> Result<i32, BackendError> {
        let rotate = resolve_inherited(&doc.inner, page.object_id, b"Rotate")?
            .and_then(object_to_f64_opt)
            .map_or(0, |r| r as i32);
        Ok(rotate)
    }

    fn interpret_page(
        doc: &LopdfDocument,
        page: &LopdfPage,
        handler: &mut dyn ContentHandler,
    ) -> Result<(), BackendError> {
        let inner = &doc.inner;
        let dict = page_dict(inner, page.object_id)?;
        let content = get_page_content_bytes(inner, dict)?;
        let resources = get_page_resources(inner, page.object_id)?;

        interpret_content_stream(
            inner,
            &content,
            resources,
            handler,
            0,
            &mut InterpreterState::new(),
            &mut TextState::new(),
        )
    }
}
