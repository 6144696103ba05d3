//! Turning interpreter glyph events into positioned [`Char`]s.

use pdfsift_core::geometry::{Ctm, Point};
use pdfsift_core::text::Char;

use crate::handler::CharEvent;
use crate::page_geometry::PageGeometry;

/// Build a [`Char`] with its bounding box in display coordinates.
///
/// The glyph box spans `[0, w0/1000]` horizontally and `[descent, ascent]/1000`
/// vertically in glyph space, mapped through the text rendering matrix
/// `Trm = [fs*Th 0 0 fs 0 rise] x Tm x CTM`. Character and word spacing move
/// the next glyph but are not part of this one's box.
pub fn char_from_event(event: &CharEvent, geometry: &PageGeometry) -> Char {
    let font_matrix = Ctm::new(
        event.font_size * event.h_scaling,
        0.0,
        0.0,
        event.font_size,
        0.0,
        event.rise,
    );
    let trm = font_matrix
        .concat(&Ctm::from_array(event.text_matrix))
        .concat(&Ctm::from_array(event.ctm));

    let w = event.displacement / 1000.0;
    let asc = event.ascent / 1000.0;
    let desc = event.descent / 1000.0;
    let corners: Vec<(f64, f64)> = [(0.0, desc), (w, desc), (w, asc), (0.0, asc)]
        .into_iter()
        .map(|(x, y)| {
            let p = trm.transform_point(Point::new(x, y));
            (p.x, p.y)
        })
        .collect();

    let text = match &event.unicode {
        Some(s) => s.clone(),
        None => char::from_u32(event.char_code)
            .map(String::from)
            .unwrap_or_else(|| "\u{FFFD}".to_string()),
    };

    Char {
        text,
        bbox: geometry.display_bbox(&corners),
        fontname: event.font_name.clone(),
        size: event.font_size,
        upright: trm.b.abs() < 1e-6 && trm.c.abs() < 1e-6,
    }
}
