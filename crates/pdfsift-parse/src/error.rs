//! Errors from reading PDF structure and interpreting content streams.

/// A page or document could not be read.
///
/// Missing fonts, missing XObjects and unknown operators are not errors; the
/// interpreter skips or defaults them.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Object structure is unreadable: bad xref, broken page tree, malformed
    /// box arrays, undecodable streams.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// The content stream cannot be tokenized, or form XObjects nest too deep.
    #[error("content stream error: {0}")]
    Interpreter(String),

    #[error("PDF is encrypted and requires a password")]
    PasswordRequired,
}
