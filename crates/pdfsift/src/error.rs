//! Errors raised while opening documents and loading pages.

use std::path::PathBuf;

use pdfsift_parse::BackendError;

/// A document or page could not be read.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF is encrypted and requires a password")]
    PasswordRequired,

    #[error("page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error(transparent)]
    Backend(BackendError),
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::PasswordRequired => PdfError::PasswordRequired,
            other => PdfError::Backend(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_error_is_lifted() {
        let err = PdfError::from(BackendError::PasswordRequired);
        assert!(matches!(err, PdfError::PasswordRequired));
    }

    #[test]
    fn backend_message_passes_through() {
        let err = PdfError::from(BackendError::Parse("bad xref".to_string()));
        assert_eq!(err.to_string(), "PDF parse error: bad xref");
    }

    #[test]
    fn io_message_names_path() {
        let err = PdfError::Io {
            path: PathBuf::from("/tmp/x.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "failed to read /tmp/x.pdf: gone");
    }
}
