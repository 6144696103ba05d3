//! Content stream interpreter.
//!
//! Walks the operators of a page (and any form XObjects it draws), tracks the
//! graphics and text state, and reports every shown glyph to a
//! [`ContentHandler`]. Path, color and image operators are skipped.

use std::collections::HashMap;

use pdfsift_core::geometry::Ctm;

use crate::cmap::CMap;
use crate::encoding::{FontEncoding, StandardEncoding, glyph_name_to_char};
use crate::error::BackendError;
use crate::font_metrics::{FontMetrics, extract_cid_font_metrics, extract_font_metrics};
use crate::handler::{CharEvent, ContentHandler};
use crate::interpreter_state::InterpreterState;
use crate::lopdf_backend::{decode_stream, object_to_f64_opt, resolve_ref};
use crate::text_renderer::{RawChar, TjElement, show_string, show_string_with_positioning};
use crate::text_state::TextState;
use crate::tokenizer::{Operand, Operator, tokenize};

/// Maximum nesting of form XObjects.
pub const MAX_FORM_DEPTH: usize = 16;

/// Font data resolved once per content stream.
struct CachedFont {
    metrics: FontMetrics,
    cmap: Option<CMap>,
    encoding: Option<FontEncoding>,
    base_name: String,
    /// Bytes per character code: 2 for Type0 fonts, 1 otherwise.
    code_width: usize,
}

impl CachedFont {
    fn fallback(resource_name: &str) -> Self {
        Self {
            metrics: FontMetrics::default_metrics(),
            cmap: None,
            encoding: None,
            base_name: resource_name.to_string(),
            code_width: 1,
        }
    }

    fn unicode(&self, code: u32) -> Option<String> {
        if let Some(s) = self.cmap.as_ref().and_then(|c| c.lookup(code)) {
            return Some(s.to_string());
        }
        if self.code_width == 1 {
            let byte = u8::try_from(code).ok()?;
            return self
                .encoding
                .as_ref()
                .and_then(|e| e.decode(byte))
                .map(String::from);
        }
        None
    }

    /// Glyph-space ascent and descent used for the character box.
    fn vertical_extent(&self) -> (f64, f64) {
        let (ascent, descent) = (self.metrics.ascent(), self.metrics.descent());
        if ascent == 0.0 && descent == 0.0 {
            (1000.0, 0.0)
        } else {
            // Box height stays one em, anchored at the font's descent.
            (1000.0 + descent, descent)
        }
    }
}

/// Interpret one content stream, recursing into form XObjects.
#[allow(clippy::too_many_arguments)]
pub(crate) fn interpret_content_stream(
    doc: &lopdf::Document,
    stream_bytes: &[u8],
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    depth: usize,
    gstate: &mut InterpreterState,
    tstate: &mut TextState,
) -> Result<(), BackendError> {
    if depth > MAX_FORM_DEPTH {
        return Err(BackendError::Interpreter(format!(
            "form XObject nesting exceeds {MAX_FORM_DEPTH} levels"
        )));
    }

    let operators = tokenize(stream_bytes)?;
    let mut fonts: HashMap<String, CachedFont> = HashMap::new();

    for op in &operators {
        match op.name.as_str() {
            "q" => gstate.save(tstate.params.clone()),
            "Q" => {
                if let Some(snapshot) = gstate.restore() {
                    tstate.params = snapshot;
                }
            }
            "cm" => {
                if let Some([a, b, c, d, e, f]) = numbers::<6>(op) {
                    gstate.concat_matrix(a, b, c, d, e, f);
                }
            }

            "BT" => tstate.begin_text(),
            "ET" => tstate.end_text(),
            "Tf" => {
                if let (Some(Operand::Name(name)), Some(size)) =
                    (op.operands.first(), number(op, 1))
                {
                    if !fonts.contains_key(name) {
                        fonts.insert(name.clone(), load_font(doc, resources, name));
                    }
                    tstate.set_font(name.clone(), size);
                }
            }
            "Tm" => {
                if let Some(m) = numbers::<6>(op) {
                    tstate.set_matrix(Ctm::from_array(m));
                }
            }
            "Td" => {
                if let Some([tx, ty]) = numbers::<2>(op) {
                    tstate.next_line_offset(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = numbers::<2>(op) {
                    tstate.next_line_offset_leading(tx, ty);
                }
            }
            "T*" => tstate.next_line(),
            "Tc" => set_param(op, &mut tstate.params.char_spacing),
            "Tw" => set_param(op, &mut tstate.params.word_spacing),
            "Tz" => set_param(op, &mut tstate.params.h_scaling),
            "TL" => set_param(op, &mut tstate.params.leading),
            "Ts" => set_param(op, &mut tstate.params.rise),

            "Tj" => {
                if let Some(bytes) = op.operands.first().and_then(Operand::as_bytes) {
                    show(handler, gstate, tstate, &fonts, bytes);
                }
            }
            "'" => {
                tstate.next_line();
                if let Some(bytes) = op.operands.first().and_then(Operand::as_bytes) {
                    show(handler, gstate, tstate, &fonts, bytes);
                }
            }
            "\"" => {
                if let Some(aw) = number(op, 0) {
                    tstate.params.word_spacing = aw;
                }
                if let Some(ac) = number(op, 1) {
                    tstate.params.char_spacing = ac;
                }
                tstate.next_line();
                if let Some(bytes) = op.operands.get(2).and_then(Operand::as_bytes) {
                    show(handler, gstate, tstate, &fonts, bytes);
                }
            }
            "TJ" => {
                if let Some(Operand::Array(items)) = op.operands.first() {
                    let elements: Vec<TjElement> = items
                        .iter()
                        .filter_map(|item| match item {
                            Operand::LiteralString(s) | Operand::HexString(s) => {
                                Some(TjElement::String(s.clone()))
                            }
                            other => other.as_f64().map(TjElement::Adjustment),
                        })
                        .collect();
                    let font = fonts.get(&tstate.params.font_name);
                    let code_width = font.map_or(1, |f| f.code_width);
                    let raw = show_string_with_positioning(
                        tstate,
                        &elements,
                        code_width,
                        &|code: u32| width_of(font, code),
                    );
                    emit(handler, gstate, tstate, font, raw);
                }
            }

            "Do" => {
                if let Some(Operand::Name(name)) = op.operands.first() {
                    draw_xobject(doc, resources, handler, depth, gstate, tstate, name)?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn number(op: &Operator, index: usize) -> Option<f64> {
    op.operands.get(index).and_then(Operand::as_f64)
}

/// The last `N` operands as numbers.
fn numbers<const N: usize>(op: &Operator) -> Option<[f64; N]> {
    let start = op.operands.len().checked_sub(N)?;
    let mut out = [0.0; N];
    for (slot, operand) in out.iter_mut().zip(&op.operands[start..]) {
        *slot = operand.as_f64()?;
    }
    Some(out)
}

fn set_param(op: &Operator, target: &mut f64) {
    if let Some(v) = number(op, 0) {
        *target = v;
    }
}

fn width_of(font: Option<&CachedFont>, code: u32) -> f64 {
    font.map_or_else(
        || FontMetrics::default_metrics().get_width(code),
        |f| f.metrics.get_width(code),
    )
}

fn show(
    handler: &mut dyn ContentHandler,
    gstate: &InterpreterState,
    tstate: &mut TextState,
    fonts: &HashMap<String, CachedFont>,
    bytes: &[u8],
) {
    let font = fonts.get(&tstate.params.font_name);
    let code_width = font.map_or(1, |f| f.code_width);
    let raw = show_string(tstate, bytes, code_width, &|code: u32| width_of(font, code));
    emit(handler, gstate, tstate, font, raw);
}

fn emit(
    handler: &mut dyn ContentHandler,
    gstate: &InterpreterState,
    tstate: &TextState,
    font: Option<&CachedFont>,
    raw: Vec<RawChar>,
) {
    let (ascent, descent) = font.map_or((750.0, -250.0), CachedFont::vertical_extent);
    let font_name = font.map_or_else(|| tstate.params.font_name.clone(), |f| f.base_name.clone());
    let ctm = gstate.ctm().to_array();

    for rc in raw {
        handler.on_char(CharEvent {
            char_code: rc.char_code,
            unicode: font.and_then(|f| f.unicode(rc.char_code)),
            font_name: font_name.clone(),
            font_size: tstate.params.font_size,
            text_matrix: rc.text_matrix,
            ctm,
            displacement: rc.width,
            h_scaling: tstate.params.h_scale(),
            rise: tstate.params.rise,
            ascent,
            descent,
        });
    }
}

/// Drop a subset tag such as `ABCDEF+` from a base font name.
fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.chars().all(|c| c.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

fn load_font(doc: &lopdf::Document, resources: &lopdf::Dictionary, name: &str) -> CachedFont {
    let font_dict = resources
        .get(b"Font")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict().ok())
        .and_then(|fonts| fonts.get(name.as_bytes()).ok())
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict().ok());

    let Some(fd) = font_dict else {
        #[cfg(feature = "tracing")]
        tracing::debug!(font = name, "font not found in resources, using default metrics");
        return CachedFont::fallback(name);
    };

    let is_type0 = fd
        .get(b"Subtype")
        .ok()
        .and_then(|o| o.as_name().ok())
        .is_some_and(|s| s == b"Type0");

    let base_name = fd
        .get(b"BaseFont")
        .ok()
        .and_then(|o| o.as_name().ok())
        .map(|n| strip_subset_prefix(&String::from_utf8_lossy(n)).to_string())
        .unwrap_or_else(|| name.to_string());

    let cmap = fd
        .get(b"ToUnicode")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_stream().ok())
        .and_then(|s| decode_stream(s).ok())
        .and_then(|data| CMap::parse(&data).ok());

    if is_type0 {
        CachedFont {
            metrics: extract_cid_font_metrics(doc, fd),
            cmap,
            encoding: None,
            base_name,
            code_width: 2,
        }
    } else {
        CachedFont {
            metrics: extract_font_metrics(doc, fd),
            cmap,
            encoding: font_encoding(doc, fd),
            base_name,
            code_width: 1,
        }
    }
}

/// The /Encoding of a simple font: a base encoding name, or a dictionary
/// with /BaseEncoding and /Differences.
fn font_encoding(doc: &lopdf::Document, fd: &lopdf::Dictionary) -> Option<FontEncoding> {
    let obj = resolve_ref(doc, fd.get(b"Encoding").ok()?);
    if let Ok(name) = obj.as_name() {
        return StandardEncoding::from_name(name).map(FontEncoding::from_standard);
    }

    let dict = obj.as_dict().ok()?;
    let base = dict
        .get(b"BaseEncoding")
        .ok()
        .and_then(|o| o.as_name().ok())
        .and_then(StandardEncoding::from_name)
        .unwrap_or(StandardEncoding::Standard);
    let mut encoding = FontEncoding::from_standard(base);

    if let Some(diffs) = dict
        .get(b"Differences")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_array().ok())
    {
        encoding.apply_differences(&differences(diffs));
    }
    Some(encoding)
}

/// `[code /name /name code /name ...]`: each name takes the next code.
fn differences(items: &[lopdf::Object]) -> Vec<(u8, char)> {
    let mut out = Vec::new();
    let mut code: Option<u32> = None;
    for item in items {
        if let Some(n) = object_to_f64_opt(item) {
            code = Some(n as u32);
        } else if let Ok(name) = item.as_name() {
            let Some(current) = code else {
                continue;
            };
            if let (Ok(byte), Some(ch)) = (
                u8::try_from(current),
                glyph_name_to_char(&String::from_utf8_lossy(name)),
            ) {
                out.push((byte, ch));
            }
            code = Some(current + 1);
        }
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn draw_xobject(
    doc: &lopdf::Document,
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    depth: usize,
    gstate: &mut InterpreterState,
    tstate: &mut TextState,
    name: &str,
) -> Result<(), BackendError> {
    let stream = resources
        .get(b"XObject")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict().ok())
        .and_then(|xobjects| xobjects.get(name.as_bytes()).ok())
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_stream().ok());

    let Some(stream) = stream else {
        #[cfg(feature = "tracing")]
        tracing::debug!(xobject = name, "XObject not found in resources");
        return Ok(());
    };

    let is_form = stream
        .dict
        .get(b"Subtype")
        .ok()
        .and_then(|o| o.as_name().ok())
        .is_some_and(|s| s == b"Form");
    if !is_form {
        return Ok(());
    }

    gstate.save(tstate.params.clone());

    if let Some(m) = stream
        .dict
        .get(b"Matrix")
        .ok()
        .and_then(|o| o.as_array().ok())
        .filter(|arr| arr.len() == 6)
    {
        let vals: Vec<f64> = m.iter().filter_map(object_to_f64_opt).collect();
        if let [a, b, c, d, e, f] = vals[..] {
            gstate.concat_matrix(a, b, c, d, e, f);
        }
    }

    let form_resources = stream
        .dict
        .get(b"Resources")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict().ok())
        .unwrap_or(resources);

    let content = decode_stream(stream)?;
    let result = interpret_content_stream(
        doc,
        &content,
        form_resources,
        handler,
        depth + 1,
        gstate,
        tstate,
    );

    if let Some(snapshot) = gstate.restore() {
        tstate.params = snapshot;
    }
    result
}
