//! Content handler callback trait for content stream interpretation.
//!
//! The interpreter reports each shown glyph to a [`ContentHandler`] as a
//! [`CharEvent`]; the handler decides what to keep.

/// Information about a rendered character glyph.
///
/// Carries everything needed to compute the glyph's bounding box later.
#[derive(Debug, Clone, PartialEq)]
pub struct CharEvent {
    /// The character code from the content stream.
    pub char_code: u32,
    /// Unicode text resolved from ToUnicode or the font encoding.
    pub unicode: Option<String>,
    /// Base font name, subset prefix stripped.
    pub font_name: String,
    /// Font size in text space units.
    pub font_size: f64,
    /// Text matrix when the glyph was shown.
    pub text_matrix: [f64; 6],
    /// Current transformation matrix when the glyph was shown.
    pub ctm: [f64; 6],
    /// Glyph width in glyph space (1/1000 of text space).
    pub displacement: f64,
    /// Horizontal scaling as a fraction (100% = 1.0).
    pub h_scaling: f64,
    /// Text rise (Ts).
    pub rise: f64,
    /// Ascent in glyph space units.
    pub ascent: f64,
    /// Descent in glyph space units (negative below the baseline).
    pub descent: f64,
}

/// Receives interpreter output.
pub trait ContentHandler {
    /// Called once per shown glyph.
    fn on_char(&mut self, event: CharEvent);
}

/// A handler that keeps every event.
#[derive(Debug, Default)]
pub struct CollectingHandler {
    pub chars: Vec<CharEvent>,
}

impl ContentHandler for CollectingHandler {
    fn on_char(&mut self, event: CharEvent) {
        self.chars.push(event);
    }
}
