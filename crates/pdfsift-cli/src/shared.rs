use std::path::Path;

use pdfsift::{Pdf, TemplateLibrary};

/// Load the template library, printing the schema error on failure.
pub fn load_library(path: &Path) -> Result<TemplateLibrary, i32> {
    TemplateLibrary::load(path).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })
}

/// Open a PDF file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found
/// or cannot be parsed as a valid PDF.
pub fn open_pdf(file: &Path) -> Result<Pdf, i32> {
    require_file(file)?;
    Pdf::open_file(file).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

/// Fail with "file not found" when `file` does not exist.
pub fn require_file(file: &Path) -> Result<(), i32> {
    if file.exists() {
        Ok(())
    } else {
        eprintln!("Error: file not found: {}", file.display());
        Err(1)
    }
}
