//! Graphics state stack for the content stream interpreter.
//!
//! Only the CTM matters for text positions; `q` also saves the text state
//! parameters so `Q` can put them back.

use pdfsift_core::geometry::Ctm;

use crate::text_state::TextParams;

#[derive(Debug, Clone, Default)]
pub struct InterpreterState {
    ctm: Ctm,
    stack: Vec<(Ctm, TextParams)>,
}

impl InterpreterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ctm(&self) -> &Ctm {
        &self.ctm
    }

    /// `cm`: the new matrix applies before the current CTM.
    pub fn concat_matrix(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.ctm = Ctm::new(a, b, c, d, e, f).concat(&self.ctm);
    }

    /// `q`.
    pub fn save(&mut self, text: TextParams) {
        self.stack.push((self.ctm, text));
    }

    /// `Q`. An unbalanced `Q` leaves the state alone and returns `None`.
    pub fn restore(&mut self) -> Option<TextParams> {
        let (ctm, text) = self.stack.pop()?;
        self.ctm = ctm;
        Some(text)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
