//! Text state for the content stream interpreter.
//!
//! [`TextParams`] holds the operator-set parameters that belong to the
//! graphics state, so `q`/`Q` save and restore them as one value. The text and
//! line matrices live only inside a `BT`/`ET` block and are not saved.

use pdfsift_core::geometry::Ctm;

/// Parameters set by `Tc Tw Tz TL Tf Ts`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextParams {
    pub char_spacing: f64,
    /// Applied to single-byte code 32 only.
    pub word_spacing: f64,
    /// Percent; 100 is unscaled.
    pub h_scaling: f64,
    pub leading: f64,
    /// Resource name from `Tf`, not the font's base name.
    pub font_name: String,
    pub font_size: f64,
    pub rise: f64,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_name: String::new(),
            font_size: 0.0,
            rise: 0.0,
        }
    }
}

impl TextParams {
    /// `Th`: horizontal scaling as a factor.
    pub fn h_scale(&self) -> f64 {
        self.h_scaling / 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextState {
    pub params: TextParams,
    in_text_object: bool,
    tm: Ctm,
    tlm: Ctm,
}

impl TextState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_text_object(&self) -> bool {
        self.in_text_object
    }

    /// `Tm`, the matrix for the next glyph.
    pub fn text_matrix(&self) -> &Ctm {
        &self.tm
    }

    /// `Tlm`, the start of the current line.
    pub fn line_matrix(&self) -> &Ctm {
        &self.tlm
    }

    pub fn begin_text(&mut self) {
        self.in_text_object = true;
        self.tm = Ctm::identity();
        self.tlm = Ctm::identity();
    }

    pub fn end_text(&mut self) {
        self.in_text_object = false;
    }

    pub fn set_font(&mut self, name: String, size: f64) {
        self.params.font_name = name;
        self.params.font_size = size;
    }

    pub fn set_matrix(&mut self, m: Ctm) {
        self.tm = m;
        self.tlm = m;
    }

    /// `Td`.
    pub fn next_line_offset(&mut self, tx: f64, ty: f64) {
        self.tlm = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, ty).concat(&self.tlm);
        self.tm = self.tlm;
    }

    /// `TD`.
    pub fn next_line_offset_leading(&mut self, tx: f64, ty: f64) {
        self.params.leading = -ty;
        self.next_line_offset(tx, ty);
    }

    /// `T*`.
    pub fn next_line(&mut self) {
        let leading = self.params.leading;
        self.next_line_offset(0.0, -leading);
    }

    /// Move along the baseline by `tx` unscaled text-space units.
    pub fn advance(&mut self, tx: f64) {
        self.tm = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, 0.0).concat(&self.tm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bt_resets_matrices() {
        let mut ts = TextState::new();
        ts.set_matrix(Ctm::new(2.0, 0.0, 0.0, 2.0, 10.0, 10.0));
        ts.begin_text();
        assert!(ts.in_text_object());
        assert_eq!(*ts.text_matrix(), Ctm::identity());
        ts.end_text();
        assert!(!ts.in_text_object());
    }

    #[test]
    fn td_accumulates_on_line_matrix() {
        let mut ts = TextState::new();
        ts.begin_text();
        ts.next_line_offset(72.0, 720.0);
        ts.next_line_offset(0.0, -14.0);
        assert_eq!(ts.text_matrix().e, 72.0);
        assert_eq!(ts.text_matrix().f, 706.0);
        assert_eq!(ts.line_matrix(), ts.text_matrix());
    }

    #[test]
    fn td_offset_is_in_line_space() {
        let mut ts = TextState::new();
        ts.set_matrix(Ctm::new(2.0, 0.0, 0.0, 2.0, 100.0, 100.0));
        ts.next_line_offset(10.0, 5.0);
        assert_eq!(ts.text_matrix().e, 120.0);
        assert_eq!(ts.text_matrix().f, 110.0);
    }

    #[test]
    fn capital_td_then_t_star() {
        let mut ts = TextState::new();
        ts.begin_text();
        ts.next_line_offset_leading(50.0, -12.0);
        assert_eq!(ts.params.leading, 12.0);
        ts.next_line();
        assert_eq!(ts.text_matrix().e, 50.0);
        assert_eq!(ts.text_matrix().f, -24.0);
    }

    #[test]
    fn advance_leaves_line_matrix() {
        let mut ts = TextState::new();
        ts.begin_text();
        ts.next_line_offset(10.0, 20.0);
        ts.advance(7.2);
        assert!((ts.text_matrix().e - 17.2).abs() < 1e-9);
        assert_eq!(ts.line_matrix().e, 10.0);
    }

    #[test]
    fn params_clone_is_a_save_point() {
        let mut ts = TextState::new();
        ts.set_font("F1".to_string(), 12.0);
        ts.params.char_spacing = 1.5;
        let saved = ts.params.clone();
        ts.set_font("F2".to_string(), 8.0);
        ts.params.char_spacing = 0.0;
        ts.params = saved;
        assert_eq!(ts.params.font_name, "F1");
        assert_eq!(ts.params.font_size, 12.0);
        assert_eq!(ts.params.char_spacing, 1.5);
        assert_eq!(ts.params.h_scale(), 1.0);
    }
}
