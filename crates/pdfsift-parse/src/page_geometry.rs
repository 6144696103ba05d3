//! Mapping from PDF user space to display coordinates.
//!
//! Display space has its origin at the top-left of the visible page, with
//! `/Rotate` applied clockwise and the CropBox as the viewport.

use pdfsift_core::geometry::BBox;

/// A page box in raw PDF coordinates (y grows upward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfBox {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl PdfBox {
    /// Build from any two corners; the result is normalized.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            llx: x0.min(x1),
            lly: y0.min(y1),
            urx: x0.max(x1),
            ury: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    /// Overlap with another box, or `None` if they do not overlap.
    pub fn intersect(&self, other: &PdfBox) -> Option<PdfBox> {
        let llx = self.llx.max(other.llx);
        let lly = self.lly.max(other.lly);
        let urx = self.urx.min(other.urx);
        let ury = self.ury.min(other.ury);
        (urx > llx && ury > lly).then_some(PdfBox { llx, lly, urx, ury })
    }
}

/// US Letter, used when a page has no usable /MediaBox.
pub const DEFAULT_MEDIA_BOX: PdfBox = PdfBox {
    llx: 0.0,
    lly: 0.0,
    urx: 612.0,
    ury: 792.0,
};

/// Transform from PDF user space into display space for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    rotation: i32,
    media: PdfBox,
    // Crop origin after rotation, relative to the media origin.
    view_x0: f64,
    view_y0: f64,
    width: f64,
    height: f64,
}

impl PageGeometry {
    /// `rotation` is taken modulo 360; values other than multiples of 90 act as 0.
    pub fn new(media: PdfBox, crop: Option<PdfBox>, rotation: i32) -> Self {
        let rotation = rotation.rem_euclid(360);
        let crop = crop
            .and_then(|c| c.intersect(&media))
            .unwrap_or(media);

        let mut geometry = Self {
            rotation,
            media,
            view_x0: 0.0,
            view_y0: 0.0,
            width: 0.0,
            height: 0.0,
        };

        let (ax, ay) = geometry.rotate(crop.llx, crop.lly);
        let (bx, by) = geometry.rotate(crop.urx, crop.ury);
        geometry.view_x0 = ax.min(bx);
        geometry.view_y0 = ay.min(by);
        geometry.width = (ax - bx).abs();
        geometry.height = (ay - by).abs();
        geometry
    }

    /// Visible width after rotation and cropping.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Visible height after rotation and cropping.
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// Rotate a user-space point clockwise about the media box, returning
    /// coordinates relative to the rotated media origin (y still upward).
    fn rotate(&self, x: f64, y: f64) -> (f64, f64) {
        let px = x - self.media.llx;
        let py = y - self.media.lly;
        let (w, h) = (self.media.width(), self.media.height());
        match self.rotation {
            90 => (py, w - px),
            180 => (w - px, h - py),
            270 => (h - py, px),
            _ => (px, py),
        }
    }

    /// Map a user-space point into display space.
    pub fn to_display(&self, x: f64, y: f64) -> (f64, f64) {
        let (rx, ry) = self.rotate(x, y);
        (rx - self.view_x0, self.height - (ry - self.view_y0))
    }

    /// Display-space bounding box of user-space points.
    pub fn display_bbox(&self, points: &[(f64, f64)]) -> BBox {
        let mut x0 = f64::INFINITY;
        let mut top = f64::INFINITY;
        let mut x1 = f64::NEG_INFINITY;
        let mut bottom = f64::NEG_INFINITY;
        for &(x, y) in points {
            let (dx, dy) = self.to_display(x, y);
            x0 = x0.min(dx);
            top = top.min(dy);
            x1 = x1.max(dx);
            bottom = bottom.max(dy);
        }
        if points.is_empty() {
            return BBox::new(0.0, 0.0, 0.0, 0.0);
        }
        BBox::new(x0, top, x1, bottom)
    }
}
