//! A single loaded page and its region text reader.

use pdfsift_core::{BBox, Char, RegionError, RegionText, TextOptions, chars_to_text};

/// A page with its characters in display coordinates (top-left origin,
/// rotation and crop applied).
#[derive(Debug, Clone)]
pub struct Page {
    index: usize,
    width: f64,
    height: f64,
    rotation: i32,
    chars: Vec<Char>,
    text_options: TextOptions,
}

impl Page {
    pub fn new(index: usize, width: f64, height: f64, chars: Vec<Char>) -> Self {
        Self {
            index,
            width,
            height,
            rotation: 0,
            chars,
            text_options: TextOptions::default(),
        }
    }

    pub(crate) fn with_rotation(mut self, rotation: i32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the tolerances used when assembling region text.
    pub fn with_text_options(mut self, options: TextOptions) -> Self {
        self.text_options = options;
        self
    }

    /// 0-based index in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based page number.
    pub fn page_number(&self) -> usize {
        self.index + 1
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    /// Characters whose center lies in `bbox`, edges included.
    pub fn chars_in(&self, bbox: &BBox) -> Vec<&Char> {
        self.chars
            .iter()
            .filter(|c| bbox.contains_point(c.bbox.center()))
            .collect()
    }

    /// Text of the whole page in reading order.
    pub fn extract_text(&self) -> String {
        let all: Vec<&Char> = self.chars.iter().collect();
        chars_to_text(&all, &self.text_options)
    }
}

impl RegionText for Page {
    fn region_text(&self, bbox: &BBox) -> Result<String, RegionError> {
        Ok(chars_to_text(&self.chars_in(bbox), &self.text_options))
    }
}
