//! pdfsift: classify PDF pages against region templates and extract fields.
//!
//! This is the facade crate. It opens documents through `pdfsift-parse`,
//! exposes pages as [`RegionText`](pdfsift_core::RegionText) sources for the
//! matching rules in `pdfsift-core`, and drives whole directories of files
//! through a bounded worker pool.
//!
//! ```ignore
//! let library = TemplateLibrary::load("templates.json")?;
//! let ctx = RunContext::new(library, RunOptions::default());
//! let report = Corpus::from_dir("statements/")?.run(&ctx);
//! write_csv_file(&report.records, "out.csv", &TableOptions::default())?;
//! ```

pub mod corpus;
pub mod discover;
pub mod error;
pub mod page;
pub mod pdf;

pub use corpus::{
    CancellationToken, Corpus, FileOutcome, RunContext, RunOptions, RunReport, process_file,
};
pub use discover::{base_name, discover_pdfs};
pub use error::PdfError;
pub use page::Page;
pub use pdf::Pdf;

pub use pdfsift_core;
pub use pdfsift_core::{
    DocumentTemplate, EntityRegion, ExtractionRecord, Rectangle, RegionText, TableOptions,
    TemplateLibrary, TextOptions, write_csv_file,
};
pub use pdfsift_parse;
