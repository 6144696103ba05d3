//! Input corpus discovery.

use std::io;
use std::path::{Path, PathBuf};

/// Regular files directly inside `dir` with a `.pdf` extension in any case,
/// sorted by file name. Subdirectories are not searched.
///
/// # Errors
///
/// Fails if `dir` cannot be listed.
pub fn discover_pdfs(dir: impl AsRef<Path>) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && is_pdf(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// The file name of `path` as shown in records and logs.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_pdfs_sorted_and_flat() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt", "c.pdf.bak"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();
        std::fs::write(dir.path().join("nested.pdf").join("inner.pdf"), b"x").unwrap();

        let names: Vec<String> = discover_pdfs(dir.path())
            .unwrap()
            .iter()
            .map(|p| base_name(p))
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_pdfs(dir.path().join("absent")).is_err());
    }

    #[test]
    fn base_name_of_path() {
        assert_eq!(base_name(Path::new("/data/in/42.pdf")), "42.pdf");
    }
}
