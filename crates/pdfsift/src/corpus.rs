//! The batch driver: one task per file on a bounded worker pool.

use std::num::NonZeroUsize;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pdfsift_core::{
    ExtractionRecord, PageContext, TemplateLibrary, TextOptions, classify, collect,
};
use rayon::prelude::*;

use crate::discover::{base_name, discover_pdfs};
use crate::error::PdfError;
use crate::pdf::Pdf;

/// Cooperative stop signal, checked before each file starts.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Tunables for a batch run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    /// Worker threads; one file per task.
    pub workers: usize,
    /// Tolerances for region text assembly.
    pub text: TextOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            text: TextOptions::default(),
        }
    }
}

/// Everything a worker needs, shared read-only across the pool.
#[derive(Debug)]
pub struct RunContext {
    library: TemplateLibrary,
    options: RunOptions,
    cancellation: CancellationToken,
}

impl RunContext {
    pub fn new(library: TemplateLibrary, options: RunOptions) -> Self {
        Self {
            library,
            options,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Handle for stopping the run from another thread.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Every page was read; `records` may be empty.
    Processed { records: Vec<ExtractionRecord> },
    /// The file could not be opened, a page failed to load, or the task panicked.
    Failed { reason: String },
    /// The run was cancelled before this file started.
    Skipped,
}

/// Totals and records of a finished run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub records: Vec<ExtractionRecord>,
    pub files_total: usize,
    pub files_failed: usize,
    pub files_skipped: usize,
    /// Files that produced at least one record.
    pub files_matched: usize,
}

impl RunReport {
    fn absorb(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Processed { records } => {
                if !records.is_empty() {
                    self.files_matched += 1;
                }
                self.records.extend(records);
            }
            FileOutcome::Failed { .. } => self.files_failed += 1,
            FileOutcome::Skipped => self.files_skipped += 1,
        }
    }
}

/// Classify every page of one file against every template and collect the
/// matches. Never panics; failures come back as [`FileOutcome::Failed`].
pub fn process_file(path: &Path, ctx: &RunContext) -> FileOutcome {
    let file = base_name(path);
    match catch_unwind(AssertUnwindSafe(|| extract_file(path, &file, ctx))) {
        Ok(Ok(records)) => FileOutcome::Processed { records },
        Ok(Err(err)) => {
            tracing::error!(file = %file, error = %err, "failed to process file");
            FileOutcome::Failed {
                reason: err.to_string(),
            }
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            tracing::error!(file = %file, panic = %reason, "file task panicked");
            FileOutcome::Failed {
                reason: format!("panicked: {reason}"),
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn extract_file(
    path: &Path,
    file: &str,
    ctx: &RunContext,
) -> Result<Vec<ExtractionRecord>, PdfError> {
    let pdf = Pdf::open_file(path)?.with_text_options(ctx.options.text);
    let num_pages = pdf.page_count();
    let mut records = Vec::new();

    for index in 0..num_pages {
        let page = pdf.page(index)?;
        let page_ctx = PageContext {
            file,
            page_number: page.page_number(),
        };

        for template in ctx.library.documents() {
            let result = classify(&page, template, page_ctx);
            if !result.matched {
                tracing::debug!(
                    file,
                    document = %template.document_name,
                    page = page_ctx.page_number,
                    "no match"
                );
                continue;
            }

            tracing::info!(
                file,
                document = %template.document_name,
                page = page_ctx.page_number,
                criteria = %result.criteria_met(),
                "page matched"
            );
            records.push(ExtractionRecord {
                document: template.document_name.clone(),
                page: page_ctx.page_number,
                criteria_met: result.criteria_met(),
                pdf_file: file.to_string(),
                num_pages,
                entities: collect(&page, template, page_ctx),
            });
        }
    }

    Ok(records)
}

/// A fixed list of input files.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    files: Vec<PathBuf>,
}

impl Corpus {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Every `.pdf` directly inside `dir`, sorted by name.
    pub fn from_dir(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        discover_pdfs(dir).map(Self::new)
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Process every file on `ctx.options().workers` threads.
    ///
    /// Records within a file are ordered by page, then template. Order across
    /// files is not fixed.
    pub fn run(&self, ctx: &RunContext) -> RunReport {
        self.run_with_progress(ctx, |_, _| {})
    }

    /// Like [`Corpus::run`], calling `on_file` on the worker thread as each
    /// file finishes or is skipped.
    pub fn run_with_progress<F>(&self, ctx: &RunContext, on_file: F) -> RunReport
    where
        F: Fn(&Path, &FileOutcome) + Sync,
    {
        let workers = ctx.options.workers.max(1);
        tracing::info!(
            files = self.files.len(),
            templates = ctx.library.len(),
            workers,
            "starting run"
        );

        let task = |path: &PathBuf| {
            let outcome = if ctx.cancellation.is_cancelled() {
                tracing::debug!(file = %base_name(path), "run cancelled; file skipped");
                FileOutcome::Skipped
            } else {
                process_file(path, ctx)
            };
            on_file(path, &outcome);
            outcome
        };

        let outcomes: Vec<FileOutcome> = match rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
        {
            Ok(pool) => pool.install(|| self.files.par_iter().map(task).collect()),
            Err(err) => {
                tracing::warn!(error = %err, "could not build worker pool; running sequentially");
                self.files.iter().map(task).collect()
            }
        };

        let mut report = RunReport {
            files_total: self.files.len(),
            ..RunReport::default()
        };
        for outcome in outcomes {
            report.absorb(outcome);
        }

        tracing::info!(
            records = report.records.len(),
            files = report.files_total,
            matched = report.files_matched,
            failed = report.files_failed,
            skipped = report.files_skipped,
            "run finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfsift_core::EntityValues;

    fn record(page: usize) -> ExtractionRecord {
        ExtractionRecord {
            document: "Invoice".to_string(),
            page,
            criteria_met: String::new(),
            pdf_file: "a.pdf".to_string(),
            num_pages: 2,
            entities: EntityValues::new(),
        }
    }

    #[test]
    fn token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn report_counts_outcomes() {
        let mut report = RunReport::default();
        report.absorb(FileOutcome::Processed {
            records: vec![record(1), record(2)],
        });
        report.absorb(FileOutcome::Processed { records: Vec::new() });
        report.absorb(FileOutcome::Failed {
            reason: "bad".to_string(),
        });
        report.absorb(FileOutcome::Skipped);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.files_matched, 1);
        assert_eq!(report.files_failed, 1);
        assert_eq!(report.files_skipped, 1);
    }

    #[test]
    fn missing_file_fails_without_panicking() {
        let ctx = RunContext::new(TemplateLibrary::default(), RunOptions::default());
        let outcome = process_file(Path::new("/nonexistent/dir/x.pdf"), &ctx);
        assert!(matches!(outcome, FileOutcome::Failed { .. }));
    }

    #[test]
    fn cancelled_run_skips_everything() {
        let ctx = RunContext::new(TemplateLibrary::default(), RunOptions::default());
        ctx.cancellation().cancel();
        let corpus = Corpus::new(vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
        let report = corpus.run(&ctx);
        assert_eq!(report.files_total, 2);
        assert_eq!(report.files_skipped, 2);
        assert!(report.records.is_empty());
    }

    #[test]
    fn cancelling_from_progress_skips_remaining_files() {
        let ctx = RunContext::new(
            TemplateLibrary::default(),
            RunOptions {
                workers: 1,
                ..RunOptions::default()
            },
        );
        let files: Vec<PathBuf> = (0..5)
            .map(|i| PathBuf::from(format!("/nonexistent/dir/{i}.pdf")))
            .collect();
        let report = Corpus::new(files).run_with_progress(&ctx, |_, _| ctx.cancellation().cancel());
        assert_eq!(report.files_total, 5);
        assert_eq!(report.files_failed, 1);
        assert_eq!(report.files_skipped, 4);
    }

    #[test]
    fn panic_payloads() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("bang")), "bang");
        assert_eq!(panic_message(&42_u8), "unknown panic");
    }

    #[test]
    fn default_workers_is_positive() {
        assert!(RunOptions::default().workers >= 1);
    }
}
