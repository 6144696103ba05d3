//! ToUnicode CMap parsing.
//!
//! Reads the `bfchar` and `bfrange` sections of an embedded `/ToUnicode`
//! stream. Destination strings are UTF-16BE hex.

use std::collections::HashMap;

use crate::error::BackendError;

/// Character code to Unicode string mapping from a ToUnicode stream.
#[derive(Debug, Clone, Default)]
pub struct CMap {
    mappings: HashMap<u32, String>,
}

impl CMap {
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut mappings = HashMap::new();

        for section in sections(&text, "beginbfchar", "endbfchar") {
            parse_bfchar(section, &mut mappings)?;
        }
        for section in sections(&text, "beginbfrange", "endbfrange") {
            parse_bfrange(section, &mut mappings)?;
        }

        Ok(Self { mappings })
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Bodies between each `begin` and the following `end` keyword.
fn sections<'a>(text: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(begin) {
        let body = &rest[start + begin.len()..];
        let Some(stop) = body.find(end) else {
            break;
        };
        out.push(&body[..stop]);
        rest = &body[stop + end.len()..];
    }
    out
}

/// All `<hex>` tokens in order.
fn hex_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        let Some(len) = rest[start + 1..].find('>') else {
            break;
        };
        tokens.push(rest[start + 1..start + 1 + len].trim());
        rest = &rest[start + 2 + len..];
    }
    tokens
}

fn parse_code(hex: &str) -> Result<u32, BackendError> {
    u32::from_str_radix(hex, 16)
        .map_err(|e| BackendError::Parse(format!("invalid CMap code '{hex}': {e}")))
}

fn decode_utf16be(hex: &str) -> Result<String, BackendError> {
    if hex.len() == 2 {
        return decode_utf16be(&format!("00{hex}"));
    }
    if hex.len() % 4 != 0 {
        return Err(BackendError::Parse(format!(
            "CMap destination '{hex}' is not UTF-16BE"
        )));
    }
    let units = hex
        .as_bytes()
        .chunks(4)
        .map(|chunk| {
            std::str::from_utf8(chunk)
                .ok()
                .and_then(|s| u16::from_str_radix(s, 16).ok())
                .ok_or_else(|| BackendError::Parse(format!("invalid UTF-16BE hex '{hex}'")))
        })
        .collect::<Result<Vec<u16>, _>>()?;
    String::from_utf16(&units)
        .map_err(|e| BackendError::Parse(format!("invalid UTF-16BE sequence: {e}")))
}

/// `<src> <dst>` pairs.
fn parse_bfchar(section: &str, mappings: &mut HashMap<u32, String>) -> Result<(), BackendError> {
    for pair in hex_tokens(section).chunks(2) {
        if let [src, dst] = pair {
            mappings.insert(parse_code(src)?, decode_utf16be(dst)?);
        }
    }
    Ok(())
}

/// `<lo> <hi> <dst>` or `<lo> <hi> [<d1> <d2> ...]` lines.
fn parse_bfrange(section: &str, mappings: &mut HashMap<u32, String>) -> Result<(), BackendError> {
    for line in section.lines() {
        let line = line.trim();
        if let Some(bracket) = line.find('[') {
            let src = hex_tokens(&line[..bracket]);
            let [lo, hi] = src[..] else {
                continue;
            };
            let codes = code_range(parse_code(lo)?, parse_code(hi)?);
            for (code, dst) in codes.zip(hex_tokens(&line[bracket..])) {
                mappings.insert(code, decode_utf16be(dst)?);
            }
        } else {
            let tokens = hex_tokens(line);
            let [lo, hi, dst] = tokens[..] else {
                continue;
            };
            let codes = code_range(parse_code(lo)?, parse_code(hi)?);
            let dst = decode_utf16be(dst)?;
            let mut units: Vec<char> = dst.chars().collect();
            let Some(last) = units.pop() else {
                continue;
            };
            // The last character of the destination increments across the range.
            for (offset, code) in (0u32..).zip(codes) {
                let next = u32::from(last).checked_add(offset).and_then(char::from_u32);
                if let Some(ch) = next {
                    let mut s: String = units.iter().collect();
                    s.push(ch);
                    mappings.insert(code, s);
                }
            }
        }
    }
    Ok(())
}

/// Largest number of codes a single bfrange line may map.
const MAX_RANGE_LEN: u32 = 0x1_0000;

/// `lo..=hi`, truncated to [`MAX_RANGE_LEN`] codes. Empty when `hi < lo`.
fn code_range(lo: u32, hi: u32) -> std::ops::RangeInclusive<u32> {
    lo..=hi.min(lo.saturating_add(MAX_RANGE_LEN - 1))
}
