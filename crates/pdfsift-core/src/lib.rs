//! pdfsift-core: Backend-independent data types and matching rules.
//!
//! This crate provides the foundational types (BBox, Rectangle, Char, templates,
//! records) and the algorithms that decide whether a page matches a template
//! and what gets extracted from it. PDF parsing lives in `pdfsift-parse`; any
//! page model that implements [`RegionText`] can be classified here.

pub mod classify;
pub mod collect;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod record;
pub mod region;
pub mod table;
pub mod template;
pub mod text;

pub use classify::{ClassificationResult, PageContext, classify};
pub use collect::collect;
pub use error::{RegionError, SchemaError, TableError};
pub use geometry::{BBox, Ctm, Point, Rectangle};
pub use layout::{TextLine, TextOptions, Word, chars_to_text, collapse_whitespace};
pub use record::{EntityValues, ExtractionRecord};
pub use region::{RegionText, read_region, read_region_collapsed};
pub use table::{Table, TableOptions, account_number, write_csv_file};
pub use template::{CriteriaRegion, DocumentTemplate, EntityRegion, RegionBox, TemplateLibrary};
pub use text::Char;
