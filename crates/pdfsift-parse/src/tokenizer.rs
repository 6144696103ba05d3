//! Content stream tokenizer for PDF operator/operand parsing.
//!
//! Parses raw PDF content stream bytes into a sequence of [`Operator`]s,
//! each carrying its [`Operand`] arguments. Comments are stripped and inline
//! images (`BI ... ID ... EI`) are skipped over without producing operators.

use crate::error::BackendError;

/// A PDF content stream operand value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Integer(i64),
    Real(f64),
    /// Name object, stored without the leading `/`.
    Name(String),
    /// Literal string `(...)` as raw bytes, escapes resolved.
    LiteralString(Vec<u8>),
    /// Hex string `<...>` as decoded bytes.
    HexString(Vec<u8>),
    Array(Vec<Operand>),
    Boolean(bool),
    Null,
    Dictionary(Vec<(String, Operand)>),
}

impl Operand {
    /// Numeric value of an integer or real operand.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Integer(i) => Some(*i as f64),
            Operand::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Bytes of a literal or hex string operand.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::LiteralString(s) | Operand::HexString(s) => Some(s),
            _ => None,
        }
    }
}

/// A PDF content stream operator with its preceding operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub name: String,
    pub operands: Vec<Operand>,
}

/// Parse PDF content stream bytes into a sequence of operators.
///
/// # Errors
///
/// Returns [`BackendError::Interpreter`] for unterminated strings, arrays,
/// or dictionaries and for invalid hex digits.
pub fn tokenize(input: &[u8]) -> Result<Vec<Operator>, BackendError> {
    let mut ops = Vec::new();
    let mut operand_stack: Vec<Operand> = Vec::new();
    let mut pos = 0;

    loop {
        skip_whitespace_and_comments(input, &mut pos);
        let Some(&b) = input.get(pos) else {
            break;
        };

        if is_keyword_start(b) {
            let keyword = parse_keyword(input, &mut pos);
            match keyword.as_str() {
                "true" => operand_stack.push(Operand::Boolean(true)),
                "false" => operand_stack.push(Operand::Boolean(false)),
                "null" => operand_stack.push(Operand::Null),
                "BI" => {
                    skip_inline_image(input, &mut pos);
                    operand_stack.clear();
                }
                _ => ops.push(Operator {
                    name: keyword,
                    operands: std::mem::take(&mut operand_stack),
                }),
            }
        } else if let Some(operand) = parse_operand(input, &mut pos)? {
            operand_stack.push(operand);
        } else {
            // Stray delimiter.
            pos += 1;
        }
    }

    Ok(ops)
}

/// Parse one operand starting at `pos`. Returns `None` (without consuming)
/// when the byte cannot start an operand.
fn parse_operand(input: &[u8], pos: &mut usize) -> Result<Option<Operand>, BackendError> {
    let operand = match input[*pos] {
        b'(' => Operand::LiteralString(parse_literal_string(input, pos)?),
        b'<' if input.get(*pos + 1) == Some(&b'<') => {
            Operand::Dictionary(parse_dictionary(input, pos)?)
        }
        b'<' => Operand::HexString(parse_hex_string(input, pos)?),
        b'[' => {
            *pos += 1;
            Operand::Array(parse_array(input, pos)?)
        }
        b'/' => Operand::Name(parse_name(input, pos)),
        b'0'..=b'9' | b'+' | b'-' | b'.' => parse_number(input, pos),
        _ => return Ok(None),
    };
    Ok(Some(operand))
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_keyword_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || matches!(b, b'*' | b'\'' | b'"')
}

fn skip_whitespace_and_comments(input: &[u8], pos: &mut usize) {
    while *pos < input.len() {
        if is_whitespace(input[*pos]) {
            *pos += 1;
        } else if input[*pos] == b'%' {
            while *pos < input.len() && input[*pos] != b'\n' && input[*pos] != b'\r' {
                *pos += 1;
            }
        } else {
            break;
        }
    }
}

fn parse_keyword(input: &[u8], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < input.len() && !is_whitespace(input[*pos]) && !is_delimiter(input[*pos]) {
        *pos += 1;
    }
    String::from_utf8_lossy(&input[start..*pos]).into_owned()
}

fn parse_name(input: &[u8], pos: &mut usize) -> String {
    *pos += 1; // '/'
    let mut name = Vec::new();
    while *pos < input.len() && !is_whitespace(input[*pos]) && !is_delimiter(input[*pos]) {
        let b = input[*pos];
        // #xx escape
        if b == b'#' {
            let hex = input.get(*pos + 1..*pos + 3).and_then(|h| {
                let hi = hex_value(h[0])?;
                let lo = hex_value(h[1])?;
                Some((hi << 4) | lo)
            });
            if let Some(decoded) = hex {
                name.push(decoded);
                *pos += 3;
                continue;
            }
        }
        name.push(b);
        *pos += 1;
    }
    String::from_utf8_lossy(&name).into_owned()
}

fn parse_number(input: &[u8], pos: &mut usize) -> Operand {
    let start = *pos;
    *pos += 1;
    while *pos < input.len() && matches!(input[*pos], b'0'..=b'9' | b'.' | b'-' | b'+') {
        *pos += 1;
    }
    let text = String::from_utf8_lossy(&input[start..*pos]);
    if let Ok(i) = text.parse::<i64>() {
        return Operand::Integer(i);
    }
    if let Ok(f) = text.parse::<f64>() {
        return Operand::Real(f);
    }
    // Producer quirks such as "--5" or "1.2.3": keep the longest numeric prefix.
    let negative = text.starts_with('-');
    let mut seen_dot = false;
    let prefix: String = text
        .trim_start_matches(['+', '-'])
        .chars()
        .take_while(|c| match c {
            '.' if !seen_dot => {
                seen_dot = true;
                true
            }
            c => c.is_ascii_digit(),
        })
        .collect();
    let value = prefix.parse::<f64>().unwrap_or(0.0);
    Operand::Real(if negative { -value } else { value })
}

fn parse_literal_string(input: &[u8], pos: &mut usize) -> Result<Vec<u8>, BackendError> {
    *pos += 1; // '('
    let mut result = Vec::new();
    let mut depth = 1u32;

    while *pos < input.len() {
        let b = input[*pos];
        *pos += 1;
        match b {
            b'(' => {
                depth += 1;
                result.push(b);
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(result);
                }
                result.push(b);
            }
            b'\\' => {
                let Some(&escaped) = input.get(*pos) else {
                    break;
                };
                *pos += 1;
                match escaped {
                    b'n' => result.push(b'\n'),
                    b'r' => result.push(b'\r'),
                    b't' => result.push(b'\t'),
                    b'b' => result.push(0x08),
                    b'f' => result.push(0x0C),
                    b'\r' => {
                        // line continuation, CR or CRLF
                        if input.get(*pos) == Some(&b'\n') {
                            *pos += 1;
                        }
                    }
                    b'\n' => {}
                    b'0'..=b'7' => {
                        let mut val = u32::from(escaped - b'0');
                        for _ in 0..2 {
                            match input.get(*pos) {
                                Some(&d @ b'0'..=b'7') => {
                                    val = val * 8 + u32::from(d - b'0');
                                    *pos += 1;
                                }
                                _ => break,
                            }
                        }
                        result.push((val & 0xFF) as u8);
                    }
                    other => result.push(other),
                }
            }
            _ => result.push(b),
        }
    }

    Err(BackendError::Interpreter(
        "unterminated literal string".to_string(),
    ))
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn parse_hex_string(input: &[u8], pos: &mut usize) -> Result<Vec<u8>, BackendError> {
    *pos += 1; // '<'
    let mut digits = Vec::new();
    loop {
        let Some(&b) = input.get(*pos) else {
            return Err(BackendError::Interpreter(
                "unterminated hex string".to_string(),
            ));
        };
        *pos += 1;
        if b == b'>' {
            break;
        }
        if is_whitespace(b) {
            continue;
        }
        let v = hex_value(b).ok_or_else(|| {
            BackendError::Interpreter(format!("invalid hex digit: {:?}", b as char))
        })?;
        digits.push(v);
    }
    if digits.len() % 2 != 0 {
        digits.push(0);
    }
    Ok(digits.chunks(2).map(|c| (c[0] << 4) | c[1]).collect())
}

/// Parse array elements until `]`. Assumes `[` already consumed.
fn parse_array(input: &[u8], pos: &mut usize) -> Result<Vec<Operand>, BackendError> {
    let mut elements = Vec::new();
    loop {
        skip_whitespace_and_comments(input, pos);
        let Some(&b) = input.get(*pos) else {
            return Err(BackendError::Interpreter("unterminated array".to_string()));
        };
        if b == b']' {
            *pos += 1;
            return Ok(elements);
        }
        if is_keyword_start(b) {
            match parse_keyword(input, pos).as_str() {
                "true" => elements.push(Operand::Boolean(true)),
                "false" => elements.push(Operand::Boolean(false)),
                _ => elements.push(Operand::Null),
            }
            continue;
        }
        match parse_operand(input, pos)? {
            Some(operand) => elements.push(operand),
            None => *pos += 1,
        }
    }
}

/// Parse `<< /Key value ... >>`.
fn parse_dictionary(input: &[u8], pos: &mut usize) -> Result<Vec<(String, Operand)>, BackendError> {
    *pos += 2; // '<<'
    let mut entries = Vec::new();
    loop {
        skip_whitespace_and_comments(input, pos);
        let Some(&b) = input.get(*pos) else {
            return Err(BackendError::Interpreter(
                "unterminated dictionary".to_string(),
            ));
        };
        if b == b'>' && input.get(*pos + 1) == Some(&b'>') {
            *pos += 2;
            return Ok(entries);
        }
        if b != b'/' {
            *pos += 1;
            continue;
        }
        let key = parse_name(input, pos);
        skip_whitespace_and_comments(input, pos);
        let value = match input.get(*pos) {
            Some(&v) if is_keyword_start(v) => match parse_keyword(input, pos).as_str() {
                "true" => Operand::Boolean(true),
                "false" => Operand::Boolean(false),
                _ => Operand::Null,
            },
            Some(_) => parse_operand(input, pos)?.unwrap_or(Operand::Null),
            None => Operand::Null,
        };
        entries.push((key, value));
    }
}

/// Skip from after `BI` past the matching `EI`.
fn skip_inline_image(input: &[u8], pos: &mut usize) {
    // Find the ID keyword that starts the binary data.
    while *pos + 1 < input.len() {
        if &input[*pos..*pos + 2] == b"ID"
            && (*pos == 0 || is_whitespace(input[*pos - 1]))
            && input.get(*pos + 2).is_none_or(|b| is_whitespace(*b))
        {
            *pos += 3;
            break;
        }
        *pos += 1;
    }
    // Binary data runs until whitespace + "EI" + whitespace/EOF.
    while *pos + 1 < input.len() {
        if &input[*pos..*pos + 2] == b"EI"
            && is_whitespace(input[*pos - 1])
            && input.get(*pos + 2).is_none_or(|b| is_whitespace(*b))
        {
            *pos += 2;
            return;
        }
        *pos += 1;
    }
    *pos = input.len();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ops: &[Operator]) -> Vec<&str> {
        ops.iter().map(|o| o.name.as_str()).collect()
    }

    #[test]
    fn simple_text_block() {
        let ops = tokenize(b"BT /F1 12 Tf 72 720 Td (Hello) Tj ET").unwrap();
        assert_eq!(names(&ops), vec!["BT", "Tf", "Td", "Tj", "ET"]);
        assert_eq!(
            ops[1].operands,
            vec![Operand::Name("F1".to_string()), Operand::Integer(12)]
        );
        assert_eq!(ops[2].operands, vec![Operand::Integer(72), Operand::Integer(720)]);
        assert_eq!(ops[3].operands, vec![Operand::LiteralString(b"Hello".to_vec())]);
    }

    #[test]
    fn reals_and_negative_numbers() {
        let ops = tokenize(b"1 0 0 1 -3.5 .25 cm").unwrap();
        assert_eq!(ops[0].operands[4], Operand::Real(-3.5));
        assert_eq!(ops[0].operands[5], Operand::Real(0.25));
    }

    #[test]
    fn literal_string_escapes_and_nesting() {
        let ops = tokenize(br"(a\(b\) (c) \101\n) Tj").unwrap();
        assert_eq!(
            ops[0].operands[0],
            Operand::LiteralString(b"a(b) (c) A\n".to_vec())
        );
    }

    #[test]
    fn hex_string_with_odd_digits() {
        let ops = tokenize(b"<48 65 6C6C 6F7> Tj").unwrap();
        assert_eq!(
            ops[0].operands[0],
            Operand::HexString(vec![0x48, 0x65, 0x6C, 0x6C, 0x6F, 0x70])
        );
    }

    #[test]
    fn tj_array() {
        let ops = tokenize(b"[(A) -120 (B)] TJ").unwrap();
        assert_eq!(
            ops[0].operands[0],
            Operand::Array(vec![
                Operand::LiteralString(b"A".to_vec()),
                Operand::Integer(-120),
                Operand::LiteralString(b"B".to_vec()),
            ])
        );
    }

    #[test]
    fn quote_operators() {
        let ops = tokenize(b"(a) ' 1 2 (b) \" T*").unwrap();
        assert_eq!(names(&ops), vec!["'", "\"", "T*"]);
        assert_eq!(ops[1].operands.len(), 3);
    }

    #[test]
    fn comments_are_skipped() {
        let ops = tokenize(b"% header\nBT % inline\nET").unwrap();
        assert_eq!(names(&ops), vec!["BT", "ET"]);
    }

    #[test]
    fn marked_content_dictionary() {
        let ops = tokenize(b"/Span << /MCID 3 /ActualText (x) >> BDC EMC").unwrap();
        assert_eq!(names(&ops), vec!["BDC", "EMC"]);
        assert_eq!(
            ops[0].operands[1],
            Operand::Dictionary(vec![
                ("MCID".to_string(), Operand::Integer(3)),
                (
                    "ActualText".to_string(),
                    Operand::LiteralString(b"x".to_vec())
                ),
            ])
        );
    }

    #[test]
    fn inline_image_is_skipped() {
        let ops = tokenize(b"q BI /W 2 /H 1 /BPC 8 ID \x00\xffEI\x01 EI Q").unwrap();
        assert_eq!(names(&ops), vec!["q", "Q"]);
    }

    #[test]
    fn name_hex_escape() {
        let ops = tokenize(b"/A#20B Tf").unwrap();
        assert_eq!(ops[0].operands[0], Operand::Name("A B".to_string()));
    }

    #[test]
    fn unterminated_string_is_error() {
        assert!(matches!(
            tokenize(b"(never closed Tj"),
            Err(BackendError::Interpreter(_))
        ));
    }

    #[test]
    fn unterminated_array_is_error() {
        assert!(tokenize(b"[(A) 10").is_err());
    }
}
