//! Page classification against a single template.

use crate::error::RegionError;
use crate::region::{RegionText, read_region};
use crate::template::DocumentTemplate;

/// Where a page sits in the corpus, for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageContext<'a> {
    /// Base name of the PDF file.
    pub file: &'a str,
    /// 1-based page number.
    pub page_number: usize,
}

/// Outcome of checking one page against one template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassificationResult {
    pub matched: bool,
    /// Criteria that held, in declared order, without repeats. On a failed
    /// match this holds the criteria that passed before the failure.
    pub satisfied: Vec<String>,
}

impl ClassificationResult {
    /// Satisfied criteria joined for the `Criteria_Met` column.
    pub fn criteria_met(&self) -> String {
        self.satisfied.join(", ")
    }
}

/// Check every criteria region of `template` against `page`, in order.
///
/// Stops at the first criterion that does not hold. A malformed region or a
/// failed read counts as a failed match for the whole template on this page.
/// A template without criteria matches every page.
pub fn classify(
    page: &dyn RegionText,
    template: &DocumentTemplate,
    ctx: PageContext<'_>,
) -> ClassificationResult {
    let mut result = ClassificationResult::default();

    for region in &template.criteria_sets {
        let bbox = match region.bbox() {
            Ok(bbox) => bbox,
            Err(err) => {
                tracing::warn!(
                    file = ctx.file,
                    document = %template.document_name,
                    page = ctx.page_number,
                    error = %err,
                    "invalid criteria region; template fails on this page"
                );
                return result;
            }
        };

        let text = match read_region(page, &bbox) {
            Ok(text) => text,
            Err(err @ RegionError::Malformed(_)) => {
                tracing::warn!(
                    file = ctx.file,
                    document = %template.document_name,
                    page = ctx.page_number,
                    criteria = %region.criteria,
                    error = %err,
                    "criteria region unreadable"
                );
                return result;
            }
            Err(err) => {
                tracing::error!(
                    file = ctx.file,
                    document = %template.document_name,
                    page = ctx.page_number,
                    criteria = %region.criteria,
                    error = %err,
                    "error reading criteria region"
                );
                return result;
            }
        };

        if !text.contains(region.criteria.as_str()) {
            return result;
        }
        if !result.satisfied.contains(&region.criteria) {
            result.satisfied.push(region.criteria.clone());
        }
    }

    result.matched = true;
    result
}
