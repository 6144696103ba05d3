//! Reading-order text assembly.
//!
//! Groups characters into lines by vertical midpoint, orders each line left to
//! right, splits lines into words at blank characters and horizontal gaps, and
//! joins the result into plain text (`" "` between words, `"\n"` between lines).

use crate::geometry::BBox;
use crate::text::Char;

/// Tolerances for grouping characters into words and lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextOptions {
    /// Maximum horizontal gap between characters of the same word.
    pub x_tolerance: f64,
    /// Maximum distance between vertical midpoints of characters on the same line.
    pub y_tolerance: f64,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
        }
    }
}

/// A word assembled from adjacent characters on one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
}

/// A line of words, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub words: Vec<Word>,
    pub bbox: BBox,
}

/// Cluster characters into lines whose vertical midpoints lie within
/// `y_tolerance` of each other. Lines come back top to bottom and the
/// characters inside each line left to right.
pub fn cluster_chars_into_lines<'a>(chars: &[&'a Char], y_tolerance: f64) -> Vec<Vec<&'a Char>> {
    let mut sorted: Vec<&Char> = chars.to_vec();
    sorted.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<(BBox, Vec<&Char>)> = Vec::new();
    for ch in sorted {
        let mid = (ch.bbox.top + ch.bbox.bottom) / 2.0;
        let existing = lines.iter_mut().find(|(bbox, _)| {
            let line_mid = (bbox.top + bbox.bottom) / 2.0;
            (mid - line_mid).abs() <= y_tolerance
        });
        match existing {
            Some((bbox, members)) => {
                *bbox = bbox.union(&ch.bbox);
                members.push(ch);
            }
            None => lines.push((ch.bbox, vec![ch])),
        }
    }

    for (_, members) in &mut lines {
        members.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }
    lines.sort_by(|(a, _), (b, _)| a.top.total_cmp(&b.top));
    lines.into_iter().map(|(_, members)| members).collect()
}

/// Split one left-to-right line of characters into words.
fn split_words(line: &[&Char], x_tolerance: f64) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<Word> = None;

    for ch in line {
        if ch.is_blank() {
            words.extend(current.take());
            continue;
        }
        match current.as_mut() {
            Some(word) if ch.bbox.x0 - word.bbox.x1 <= x_tolerance => {
                word.text.push_str(&ch.text);
                word.bbox = word.bbox.union(&ch.bbox);
            }
            _ => {
                words.extend(current.take());
                current = Some(Word {
                    text: ch.text.clone(),
                    bbox: ch.bbox,
                });
            }
        }
    }
    words.extend(current);
    words
}

/// Group characters into lines of words.
pub fn extract_lines(chars: &[&Char], options: &TextOptions) -> Vec<TextLine> {
    cluster_chars_into_lines(chars, options.y_tolerance)
        .iter()
        .filter_map(|line| {
            let words = split_words(line, options.x_tolerance);
            let bbox = words
                .iter()
                .map(|w| w.bbox)
                .reduce(|acc, b| acc.union(&b))?;
            Some(TextLine { words, bbox })
        })
        .collect()
}

/// Assemble characters into reading-order text.
pub fn chars_to_text(chars: &[&Char], options: &TextOptions) -> String {
    extract_lines(chars, options)
        .iter()
        .map(|line| {
            line.words
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse every whitespace run (newlines included) to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_char(text: &str, x0: f64, top: f64) -> Char {
        Char {
            text: text.to_string(),
            bbox: BBox::new(x0, top, x0 + 6.0, top + 12.0),
            fontname: "Helvetica".to_string(),
            size: 12.0,
            upright: true,
        }
    }

    fn chars_of(s: &str, x0: f64, top: f64) -> Vec<Char> {
        s.chars()
            .enumerate()
            .map(|(i, c)| make_char(&c.to_string(), x0 + i as f64 * 6.0, top))
            .collect()
    }

    #[test]
    fn single_line_with_spaces() {
        let chars = chars_of("Invoice No: 12345", 10.0, 100.0);
        let refs: Vec<&Char> = chars.iter().collect();
        assert_eq!(
            chars_to_text(&refs, &TextOptions::default()),
            "Invoice No: 12345"
        );
    }

    #[test]
    fn lines_are_ordered_top_to_bottom() {
        let mut chars = chars_of("second", 10.0, 130.0);
        chars.extend(chars_of("first", 10.0, 100.0));
        let refs: Vec<&Char> = chars.iter().collect();
        assert_eq!(
            chars_to_text(&refs, &TextOptions::default()),
            "first\nsecond"
        );
    }

    #[test]
    fn slight_baseline_jitter_stays_on_one_line() {
        let mut chars = chars_of("AB", 10.0, 100.0);
        chars.extend(chars_of("CD", 22.0, 101.5));
        let refs: Vec<&Char> = chars.iter().collect();
        assert_eq!(chars_to_text(&refs, &TextOptions::default()), "ABCD");
    }

    #[test]
    fn gap_wider_than_tolerance_splits_words() {
        let mut chars = chars_of("Total", 10.0, 100.0);
        chars.extend(chars_of("42.00", 100.0, 100.0));
        let refs: Vec<&Char> = chars.iter().collect();
        assert_eq!(
            chars_to_text(&refs, &TextOptions::default()),
            "Total 42.00"
        );
    }

    #[test]
    fn unordered_input_is_sorted_left_to_right() {
        let mut chars = chars_of("ACME", 10.0, 100.0);
        chars.reverse();
        let refs: Vec<&Char> = chars.iter().collect();
        assert_eq!(chars_to_text(&refs, &TextOptions::default()), "ACME");
    }

    #[test]
    fn empty_input_gives_empty_text() {
        assert_eq!(chars_to_text(&[], &TextOptions::default()), "");
    }

    #[test]
    fn blank_only_line_is_dropped() {
        let chars = chars_of("   ", 10.0, 100.0);
        let refs: Vec<&Char> = chars.iter().collect();
        assert!(extract_lines(&refs, &TextOptions::default()).is_empty());
    }

    #[test]
    fn collapse_whitespace_joins_lines() {
        assert_eq!(collapse_whitespace("Acme\nCorp  Inc"), "Acme Corp Inc");
        assert_eq!(collapse_whitespace("  \n\t "), "");
        assert_eq!(collapse_whitespace(" padded "), "padded");
    }
}
