//! Tabular output of extraction records.
//!
//! Columns are a fixed prefix followed by the union of entity names across all
//! records, in first-seen order. Cells for entities a record does not carry are
//! left empty.

use std::io::Write;
use std::path::Path;

use crate::error::TableError;
use crate::record::{CRITERIA_MET, DOCUMENT, ExtractionRecord, NUM_PAGES, PAGE, PDF_FILE};

pub const ACCOUNT_NUMBER: &str = "AccountNumber";

/// Leading columns of every table.
pub const PREFIX_COLUMNS: [&str; 5] = [ACCOUNT_NUMBER, PDF_FILE, NUM_PAGES, PAGE, DOCUMENT];

/// Names that never become entity columns.
pub const RESERVED_COLUMNS: [&str; 3] = ["criteria", "document", CRITERIA_MET];

/// Output options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// Emit a `Criteria_Met` column right after the prefix.
    pub criteria_column: bool,
}

/// First 10 characters of the file name, left-padded with `'0'` to width 10.
pub fn account_number(pdf_file: &str) -> String {
    let head: String = pdf_file.chars().take(10).collect();
    format!("{head:0>10}")
}

/// A materialized table: header plus rows of equal width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn is_excluded(name: &str) -> bool {
    PREFIX_COLUMNS.contains(&name) || RESERVED_COLUMNS.contains(&name)
}

impl Table {
    /// Lay out `records` as rows under the derived column set.
    pub fn from_records(records: &[ExtractionRecord], options: &TableOptions) -> Self {
        let mut entity_columns: Vec<&str> = Vec::new();
        for record in records {
            for name in record.entities.names() {
                if !is_excluded(name) && !entity_columns.contains(&name) {
                    entity_columns.push(name);
                }
            }
        }

        let mut columns: Vec<String> = PREFIX_COLUMNS.iter().map(|c| c.to_string()).collect();
        if options.criteria_column {
            columns.push(CRITERIA_MET.to_string());
        }
        columns.extend(entity_columns.iter().map(|c| c.to_string()));

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| match column.as_str() {
                        ACCOUNT_NUMBER => account_number(&record.pdf_file),
                        other => record.field(other).unwrap_or_default(),
                    })
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Serialize as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Write `records` as a CSV file at `path`.
pub fn write_csv_file(
    records: &[ExtractionRecord],
    path: impl AsRef<Path>,
    options: &TableOptions,
) -> Result<(), TableError> {
    let file = std::fs::File::create(path.as_ref())?;
    Table::from_records(records, options).write_csv(std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EntityValues;

    fn record(file: &str, page: usize, entities: &[(&str, &str)]) -> ExtractionRecord {
        let mut values = EntityValues::new();
        for (name, value) in entities {
            values.set(name, value.to_string());
        }
        ExtractionRecord {
            document: "Invoice".to_string(),
            page,
            criteria_met: "ACME".to_string(),
            pdf_file: file.to_string(),
            num_pages: 3,
            entities: values,
        }
    }

    fn to_csv(table: &Table) -> String {
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn account_number_slices_then_pads() {
        assert_eq!(account_number("42.pdf"), "000042.pdf");
        assert_eq!(account_number("1234567890123.pdf"), "1234567890");
        assert_eq!(account_number("0123456789.pdf"), "0123456789");
        assert_eq!(account_number(""), "0000000000");
    }

    #[test]
    fn sparse_union_of_entity_columns() {
        let records = vec![
            record("a.pdf", 1, &[("Total", "10"), ("Date", "2024-01-01")]),
            record("b.pdf", 2, &[("Vendor", "Acme"), ("Total", "20")]),
        ];
        let table = Table::from_records(&records, &TableOptions::default());
        assert_eq!(
            table.columns,
            vec![
                "AccountNumber",
                "PDF_File",
                "NumPages",
                "Page",
                "Document",
                "Total",
                "Date",
                "Vendor"
            ]
        );
        assert_eq!(
            table.rows[1],
            vec!["00000b.pdf", "b.pdf", "3", "2", "Invoice", "20", "", "Acme"]
        );
    }

    #[test]
    fn colliding_entity_names_are_excluded() {
        let records = vec![record(
            "a.pdf",
            1,
            &[("Page", "x"), ("document", "y"), ("criteria", "z"), ("Real", "v")],
        )];
        let table = Table::from_records(&records, &TableOptions::default());
        assert_eq!(table.columns.len(), 6);
        assert_eq!(table.columns[5], "Real");
        assert_eq!(table.rows[0][3], "1");
    }

    #[test]
    fn optional_criteria_column() {
        let records = vec![record("a.pdf", 1, &[("Total", "10")])];
        let table = Table::from_records(
            &records,
            &TableOptions {
                criteria_column: true,
            },
        );
        assert_eq!(table.columns[5], "Criteria_Met");
        assert_eq!(table.rows[0][5], "ACME");
        assert_eq!(table.columns[6], "Total");
    }

    #[test]
    fn csv_has_header_and_quotes_when_needed() {
        let records = vec![record("a.pdf", 1, &[("Vendor", "Acme, Inc")])];
        let csv = to_csv(&Table::from_records(&records, &TableOptions::default()));
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("AccountNumber,PDF_File,NumPages,Page,Document,Vendor")
        );
        assert_eq!(
            lines.next(),
            Some("00000a.pdf,a.pdf,3,1,Invoice,\"Acme, Inc\"")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn no_records_writes_prefix_header_only() {
        let csv = to_csv(&Table::from_records(&[], &TableOptions::default()));
        assert_eq!(csv, "AccountNumber,PDF_File,NumPages,Page,Document\n");
    }

    #[test]
    fn write_csv_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv_file(
            &[record("42.pdf", 1, &[("Total", "9")])],
            &path,
            &TableOptions::default(),
        )
        .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("000042.pdf,42.pdf,3,1,Invoice,9"));
    }
}
