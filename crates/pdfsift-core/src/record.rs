//! Extraction records: one row per (file, page, matched template).

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Column names of the fixed record fields.
pub const DOCUMENT: &str = "Document";
pub const PAGE: &str = "Page";
pub const CRITERIA_MET: &str = "Criteria_Met";
pub const PDF_FILE: &str = "PDF_File";
pub const NUM_PAGES: &str = "NumPages";

/// Entity values keyed by name, in first-insertion order.
///
/// Setting an existing name replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityValues {
    entries: Vec<(String, String)>,
}

impl EntityValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: String) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRecord {
    /// Name of the matched template.
    pub document: String,
    /// 1-based page number.
    pub page: usize,
    /// Satisfied criteria, joined with `", "`.
    pub criteria_met: String,
    /// Base name of the source PDF.
    pub pdf_file: String,
    /// Total pages in the source PDF.
    pub num_pages: usize,
    pub entities: EntityValues,
}

impl ExtractionRecord {
    /// Value of any column by name, fixed fields first.
    pub fn field(&self, column: &str) -> Option<String> {
        match column {
            DOCUMENT => Some(self.document.clone()),
            PAGE => Some(self.page.to_string()),
            CRITERIA_MET => Some(self.criteria_met.clone()),
            PDF_FILE => Some(self.pdf_file.clone()),
            NUM_PAGES => Some(self.num_pages.to_string()),
            other => self.entities.get(other).map(str::to_string),
        }
    }
}

fn is_fixed_field(name: &str) -> bool {
    matches!(name, DOCUMENT | PAGE | CRITERIA_MET | PDF_FILE | NUM_PAGES)
}

impl Serialize for ExtractionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(DOCUMENT, &self.document)?;
        map.serialize_entry(PAGE, &self.page)?;
        map.serialize_entry(CRITERIA_MET, &self.criteria_met)?;
        map.serialize_entry(PDF_FILE, &self.pdf_file)?;
        map.serialize_entry(NUM_PAGES, &self.num_pages)?;
        for (name, value) in self.entities.iter() {
            if !is_fixed_field(name) {
                map.serialize_entry(name, value)?;
            }
        }
        map.end()
    }
}
