//! Text showing operators (Tj, TJ, ', ") for the content stream interpreter.
//!
//! Splits string operands into character codes, snapshots the text matrix
//! for each glyph, and advances the text position within the [`TextState`].

use crate::text_state::TextState;

/// A glyph placed by a text showing operator, before Unicode mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChar {
    /// The character code (one byte for simple fonts, two for Type0 fonts).
    pub char_code: u32,
    /// Glyph width in glyph space (1/1000 of text space).
    pub width: f64,
    /// The text matrix at the moment this glyph was shown.
    pub text_matrix: [f64; 6],
}

/// An element of a TJ array operand.
#[derive(Debug, Clone, PartialEq)]
pub enum TjElement {
    /// Bytes to show.
    String(Vec<u8>),
    /// Adjustment in thousandths of text space; positive moves left.
    Adjustment(f64),
}

/// Split a string into character codes of `code_width` bytes (1 or 2).
/// A trailing odd byte of a 2-byte string becomes a 1-byte code.
pub fn char_codes(bytes: &[u8], code_width: usize) -> Vec<u32> {
    if code_width < 2 {
        return bytes.iter().map(|b| u32::from(*b)).collect();
    }
    bytes
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => (u32::from(*hi) << 8) | u32::from(*lo),
            [single] => u32::from(*single),
            _ => 0,
        })
        .collect()
}

/// `Tj`: show a string.
///
/// Displacement per glyph is
/// `((w0 / 1000) * font_size + char_spacing + word_spacing_if_space) * h_scaling`.
pub fn show_string(
    text_state: &mut TextState,
    string_bytes: &[u8],
    code_width: usize,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    let codes = char_codes(string_bytes, code_width);
    let mut chars = Vec::with_capacity(codes.len());

    for char_code in codes {
        let text_matrix = text_state.text_matrix().to_array();
        let w0 = get_width(char_code);
        let word_spacing = if code_width == 1 && char_code == 32 {
            text_state.params.word_spacing
        } else {
            0.0
        };
        let params = &text_state.params;
        let tx = ((w0 / 1000.0) * params.font_size + params.char_spacing + word_spacing)
            * params.h_scale();

        chars.push(RawChar {
            char_code,
            width: w0,
            text_matrix,
        });
        text_state.advance(tx);
    }

    chars
}

/// `TJ`: show strings with positioning adjustments.
pub fn show_string_with_positioning(
    text_state: &mut TextState,
    elements: &[TjElement],
    code_width: usize,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    let mut chars = Vec::new();

    for element in elements {
        match element {
            TjElement::String(bytes) => {
                chars.extend(show_string(text_state, bytes, code_width, get_width));
            }
            TjElement::Adjustment(adj) => {
                let params = &text_state.params;
                let tx = -(adj / 1000.0) * params.font_size * params.h_scale();
                text_state.advance(tx);
            }
        }
    }

    chars
}
