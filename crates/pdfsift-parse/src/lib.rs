//! pdfsift-parse: PDF reading and text positioning for pdfsift.
//!
//! Layer 1 opens the file and walks the page tree through [`lopdf`]. Layer 2
//! interprets each page's content stream, resolving fonts and encodings, and
//! reports glyphs as [`CharEvent`]s. [`char_from_event`] and
//! [`PageGeometry`] turn those events into display-space
//! [`Char`](pdfsift_core::Char)s.

pub mod backend;
pub mod char_extraction;
pub mod cmap;
pub mod encoding;
pub mod error;
pub mod font_metrics;
pub mod handler;
pub mod interpreter;
pub mod interpreter_state;
pub mod lopdf_backend;
pub mod page_geometry;
pub mod text_renderer;
pub mod text_state;
pub mod tokenizer;

pub use backend::PdfBackend;
pub use char_extraction::char_from_event;
pub use cmap::CMap;
pub use encoding::{FontEncoding, StandardEncoding, glyph_name_to_char};
pub use error::BackendError;
pub use font_metrics::FontMetrics;
pub use handler::{CharEvent, CollectingHandler, ContentHandler};
pub use interpreter::MAX_FORM_DEPTH;
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
pub use page_geometry::{PageGeometry, PdfBox};
