//! Entity collection for pages that matched a template.

use crate::classify::PageContext;
use crate::record::EntityValues;
use crate::region::{RegionText, read_region_collapsed};
use crate::template::DocumentTemplate;

/// Read every entity region of `template` from `page`, in declared order.
///
/// A malformed region or a failed read skips that one entity; the remaining
/// entities are still collected. Later regions overwrite earlier ones with
/// the same name.
pub fn collect(
    page: &dyn RegionText,
    template: &DocumentTemplate,
    ctx: PageContext<'_>,
) -> EntityValues {
    let mut values = EntityValues::new();

    for entity in &template.entities {
        let bbox = match entity.coordinates.bbox() {
            Ok(bbox) => bbox,
            Err(err) => {
                tracing::warn!(
                    file = ctx.file,
                    document = %template.document_name,
                    page = ctx.page_number,
                    entity = %entity.name,
                    error = %err,
                    "invalid entity coordinates; field skipped"
                );
                continue;
            }
        };

        match read_region_collapsed(page, &bbox) {
            Ok(text) => values.set(&entity.name, text),
            Err(err) => {
                tracing::error!(
                    file = ctx.file,
                    document = %template.document_name,
                    page = ctx.page_number,
                    entity = %entity.name,
                    error = %err,
                    "error extracting entity"
                );
            }
        }
    }

    values
}
