//! Font metrics extraction from PDF font dictionaries.
//!
//! Parses /Widths, /FirstChar, /LastChar and /FontDescriptor for simple fonts,
//! and /DW plus /W from the descendant CIDFont of Type0 fonts. Widths are in
//! glyph space units (1/1000 of text space).

use std::collections::HashMap;

use crate::lopdf_backend::{object_to_f64_opt, resolve_ref};

/// Default ascent when not specified.
const DEFAULT_ASCENT: f64 = 750.0;

/// Default descent when not specified.
const DEFAULT_DESCENT: f64 = -250.0;

/// Default width for simple fonts when not specified.
const DEFAULT_WIDTH: f64 = 600.0;

/// Default width for CID fonts without /DW.
const DEFAULT_CID_WIDTH: f64 = 1000.0;

/// Glyph widths and vertical metrics of one font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    widths: Widths,
    missing_width: f64,
    ascent: f64,
    descent: f64,
}

#[derive(Debug, Clone, PartialEq)]
enum Widths {
    /// Simple font: widths indexed by `code - first_char`.
    Range { first_char: u32, widths: Vec<f64> },
    /// CID font: explicit widths per CID.
    Cid(HashMap<u32, f64>),
}

impl FontMetrics {
    /// Metrics for a simple font.
    pub fn new(
        widths: Vec<f64>,
        first_char: u32,
        missing_width: f64,
        ascent: f64,
        descent: f64,
    ) -> Self {
        Self {
            widths: Widths::Range { first_char, widths },
            missing_width,
            ascent,
            descent,
        }
    }

    /// Metrics used when the font cannot be resolved.
    pub fn default_metrics() -> Self {
        Self::new(Vec::new(), 0, DEFAULT_WIDTH, DEFAULT_ASCENT, DEFAULT_DESCENT)
    }

    /// Width of a character code.
    pub fn get_width(&self, char_code: u32) -> f64 {
        let found = match &self.widths {
            Widths::Range { first_char, widths } => char_code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize))
                .copied(),
            Widths::Cid(map) => map.get(&char_code).copied(),
        };
        found.unwrap_or(self.missing_width)
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }

    pub fn missing_width(&self) -> f64 {
        self.missing_width
    }
}

/// Ascent, descent and missing width from a /FontDescriptor.
struct DescriptorInfo {
    ascent: f64,
    descent: f64,
    missing_width: Option<f64>,
}

fn parse_font_descriptor(doc: &lopdf::Document, font_dict: &lopdf::Dictionary) -> DescriptorInfo {
    let desc = font_dict
        .get(b"FontDescriptor")
        .ok()
        .map(|obj| resolve_ref(doc, obj))
        .and_then(|obj| obj.as_dict().ok());

    let Some(desc) = desc else {
        return DescriptorInfo {
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
            missing_width: None,
        };
    };

    let number = |key: &[u8]| {
        desc.get(key)
            .ok()
            .map(|o| resolve_ref(doc, o))
            .and_then(object_to_f64_opt)
    };

    DescriptorInfo {
        ascent: number(b"Ascent").unwrap_or(DEFAULT_ASCENT),
        descent: number(b"Descent").unwrap_or(DEFAULT_DESCENT),
        missing_width: number(b"MissingWidth"),
    }
}

/// Extract [`FontMetrics`] from a simple font dictionary.
pub fn extract_font_metrics(doc: &lopdf::Document, font_dict: &lopdf::Dictionary) -> FontMetrics {
    let first_char = font_dict
        .get(b"FirstChar")
        .ok()
        .and_then(object_to_f64_opt)
        .map_or(0, |v| v as u32);

    let widths: Vec<f64> = font_dict
        .get(b"Widths")
        .ok()
        .map(|obj| resolve_ref(doc, obj))
        .and_then(|obj| obj.as_array().ok())
        .map(|arr| {
            arr.iter()
                .map(|o| object_to_f64_opt(resolve_ref(doc, o)).unwrap_or(0.0))
                .collect()
        })
        .unwrap_or_default();

    let desc = parse_font_descriptor(doc, font_dict);
    FontMetrics::new(
        widths,
        first_char,
        desc.missing_width.unwrap_or(DEFAULT_WIDTH),
        desc.ascent,
        desc.descent,
    )
}

/// The first /DescendantFonts entry of a Type0 font.
pub fn descendant_font<'a>(
    doc: &'a lopdf::Document,
    type0: &'a lopdf::Dictionary,
) -> Option<&'a lopdf::Dictionary> {
    let arr = resolve_ref(doc, type0.get(b"DescendantFonts").ok()?)
        .as_array()
        .ok()?;
    resolve_ref(doc, arr.first()?).as_dict().ok()
}

/// Extract [`FontMetrics`] from a Type0 font via its descendant CIDFont.
pub fn extract_cid_font_metrics(doc: &lopdf::Document, type0: &lopdf::Dictionary) -> FontMetrics {
    let Some(cid_font) = descendant_font(doc, type0) else {
        return FontMetrics {
            widths: Widths::Cid(HashMap::new()),
            missing_width: DEFAULT_CID_WIDTH,
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
        };
    };

    let default_width = cid_font
        .get(b"DW")
        .ok()
        .and_then(object_to_f64_opt)
        .unwrap_or(DEFAULT_CID_WIDTH);

    let widths = cid_font
        .get(b"W")
        .ok()
        .map(|obj| resolve_ref(doc, obj))
        .and_then(|obj| obj.as_array().ok())
        .map(|arr| parse_cid_widths(doc, arr))
        .unwrap_or_default();

    let desc = parse_font_descriptor(doc, cid_font);
    FontMetrics {
        widths: Widths::Cid(widths),
        missing_width: default_width,
        ascent: desc.ascent,
        descent: desc.descent,
    }
}

/// Parse a CIDFont /W array: `c [w1 w2 ...]` and `c_first c_last w` runs.
fn parse_cid_widths(doc: &lopdf::Document, arr: &[lopdf::Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let mut i = 0;
    while i < arr.len() {
        let Some(start) = object_to_f64_opt(resolve_ref(doc, &arr[i])) else {
            break;
        };
        let start = start as u32;
        match arr.get(i + 1).map(|o| resolve_ref(doc, o)) {
            Some(lopdf::Object::Array(list)) => {
                for (offset, w) in list.iter().enumerate() {
                    if let Some(w) = object_to_f64_opt(resolve_ref(doc, w)) {
                        widths.insert(start + offset as u32, w);
                    }
                }
                i += 2;
            }
            Some(end) => {
                let end = object_to_f64_opt(end).map_or(start, |v| v as u32);
                let w = arr
                    .get(i + 2)
                    .and_then(|o| object_to_f64_opt(resolve_ref(doc, o)));
                if let Some(w) = w {
                    for cid in start..=end.min(start.saturating_add(0xFFFF)) {
                        widths.insert(cid, w);
                    }
                }
                i += 3;
            }
            None => break,
        }
    }
    widths
}
