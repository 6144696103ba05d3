use std::path::Path;

use pdfsift::{Corpus, RunContext, RunOptions, TableOptions, write_csv_file};

use crate::shared::load_library;

pub fn run(
    templates: &Path,
    input: &Path,
    output: &Path,
    workers: Option<usize>,
    criteria_column: bool,
) -> Result<(), i32> {
    let library = load_library(templates)?;

    let corpus = Corpus::from_dir(input).map_err(|e| {
        eprintln!("Error: cannot read input directory {}: {e}", input.display());
        1
    })?;

    let mut options = RunOptions::default();
    if let Some(workers) = workers {
        options.workers = workers.max(1);
    }
    let ctx = RunContext::new(library, options);
    let report = corpus.run(&ctx);

    let table_options = TableOptions { criteria_column };
    write_csv_file(&report.records, output, &table_options).map_err(|e| {
        eprintln!("Error: failed to write {}: {e}", output.display());
        1
    })?;

    tracing::info!(
        records = report.records.len(),
        files = report.files_total,
        failed = report.files_failed,
        output = %output.display(),
        "wrote results"
    );
    Ok(())
}
