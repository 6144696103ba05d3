use std::path::Path;

use pdfsift::{FileOutcome, RunContext, RunOptions, process_file};

use crate::cli::OutputFormat;
use crate::shared::{load_library, require_file};

pub fn run(templates: &Path, file: &Path, format: &OutputFormat) -> Result<(), i32> {
    let library = load_library(templates)?;
    require_file(file)?;

    let options = RunOptions {
        workers: 1,
        ..RunOptions::default()
    };
    let ctx = RunContext::new(library, options);

    let records = match process_file(file, &ctx) {
        FileOutcome::Processed { records } => records,
        FileOutcome::Failed { reason } => {
            eprintln!("Error: failed to process PDF: {reason}");
            return Err(1);
        }
        FileOutcome::Skipped => Vec::new(),
    };

    for record in &records {
        match format {
            OutputFormat::Text => {
                let fields: Vec<String> = record
                    .entities
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect();
                println!(
                    "{}\t{}\t{}\t{}",
                    record.page,
                    record.document,
                    record.criteria_met,
                    fields.join("\t")
                );
            }
            OutputFormat::Json => {
                let line = serde_json::to_string(record).map_err(|e| {
                    eprintln!("Error: {e}");
                    1
                })?;
                println!("{line}");
            }
        }
    }

    if records.is_empty() {
        eprintln!("No pages matched any template.");
    }
    Ok(())
}
