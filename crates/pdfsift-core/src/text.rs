use crate::geometry::BBox;

/// A single character extracted from a PDF page.
#[derive(Debug, Clone, PartialEq)]
pub struct Char {
    /// The text content (usually one Unicode scalar, sometimes a ligature expansion).
    pub text: String,
    /// Bounding box in top-left page coordinates.
    pub bbox: BBox,
    /// Font name (subset prefix stripped).
    pub fontname: String,
    /// Font size in points.
    pub size: f64,
    /// Whether the glyph is upright (no rotation or shear).
    pub upright: bool,
}

impl Char {
    /// Whether the character renders as whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}
