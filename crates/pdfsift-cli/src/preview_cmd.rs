use pdfsift::pdfsift_core::collapse_whitespace;
use pdfsift::{Rectangle, RegionText};

use crate::cli::PreviewArgs;
use crate::shared::{load_library, open_pdf};

/// Exit code when the region text differs from the entity's expected text.
pub const MISMATCH_EXIT: i32 = 2;

pub fn run(args: &PreviewArgs) -> Result<(), i32> {
    let (rect, expected) = resolve_region(args)?;

    let pdf = open_pdf(&args.file)?;
    if args.page == 0 || args.page > pdf.page_count() {
        eprintln!(
            "Error: page {} out of range (document has {} pages)",
            args.page,
            pdf.page_count()
        );
        return Err(1);
    }
    let page = pdf.page(args.page - 1).map_err(|e| {
        eprintln!("Error reading page {}: {e}", args.page);
        1
    })?;

    let raw = page.region_text(&rect.to_bbox()).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    let value = collapse_whitespace(&raw);
    if args.raw {
        println!("{raw}");
    } else {
        println!("{value}");
    }

    if let Some(expected) = expected {
        if value == expected {
            eprintln!("expected text: match");
        } else {
            eprintln!("expected text: MISMATCH (expected {expected:?}, got {value:?})");
            return Err(MISMATCH_EXIT);
        }
    }
    Ok(())
}

/// The rectangle to read and the entity's expected value, if any.
fn resolve_region(args: &PreviewArgs) -> Result<(Rectangle, Option<String>), i32> {
    if let Some(rect) = args.rect {
        return Ok((rect.normalized(), None));
    }

    // clap enforces that these travel together.
    let (Some(templates), Some(document), Some(entity)) =
        (&args.templates, &args.document, &args.entity)
    else {
        eprintln!("Error: either --rect or --templates/--document/--entity is required");
        return Err(1);
    };

    let library = load_library(templates)?;
    let Some(template) = library.find(document) else {
        eprintln!("Error: no template named '{document}'");
        return Err(1);
    };
    let Some(region) = template.entity(entity) else {
        eprintln!("Error: template '{document}' has no entity '{entity}'");
        return Err(1);
    };
    let rect = region.coordinates.rect().map_err(|e| {
        eprintln!("Error: entity '{entity}': {e}");
        1
    })?;
    Ok((rect, region.expected_text.clone()))
}
