//! Region text reading.
//!
//! [`RegionText`] is the seam between the matching rules in this crate and a
//! concrete page model. Criteria are tested against the raw text of a region;
//! entity values use the whitespace-collapsed form.

use crate::error::RegionError;
use crate::geometry::BBox;
use crate::layout::collapse_whitespace;

/// A page (or anything page-like) that can report the text inside a box.
pub trait RegionText {
    /// Text of the glyphs inside `bbox`, in reading order. Lines are separated
    /// by `"\n"`. A box with no glyphs yields `""`.
    fn region_text(&self, bbox: &BBox) -> Result<String, RegionError>;
}

/// Raw region text, as used for criteria matching.
pub fn read_region(page: &dyn RegionText, bbox: &BBox) -> Result<String, RegionError> {
    page.region_text(bbox)
}

/// Whitespace-collapsed, trimmed region text, as used for entity values.
pub fn read_region_collapsed(page: &dyn RegionText, bbox: &BBox) -> Result<String, RegionError> {
    page.region_text(bbox).map(|text| collapse_whitespace(&text))
}
