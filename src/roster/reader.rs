use crate::error::Result;
use crate::model::{ColumnLayout, Entry};
use csv::ReaderBuilder;
use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Read roster entries from CSV content.
///
/// The first row is always treated as a header and discarded. Blank lines are
/// skipped and rows may have any number of fields. Bytes that are not valid
/// UTF-8 are replaced rather than rejecting the roster.
pub fn read_roster<R: Read>(source: R, layout: &ColumnLayout) -> Result<Vec<Entry>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let mut entries = Vec::new();
    for (row, record) in reader.byte_records().enumerate() {
        let record = record?;
        let fields: Vec<Cow<str>> = record.iter().map(String::from_utf8_lossy).collect();
        if fields.iter().any(|f| matches!(f, Cow::Owned(_))) {
            log::warn!("Row {}: invalid UTF-8 replaced", row + 2);
        }
        entries.push(layout.entry_from_fields(fields.iter().map(|f| f.as_ref())));
    }

    let mut seen = HashSet::new();
    for (row, entry) in entries.iter().enumerate() {
        // Row numbers count the header as row 1
        if entry.location.is_empty() {
            log::warn!("Row {}: empty location, grouping under \"\"", row + 2);
        }
        if !seen.insert(entry.identifier.as_str()) {
            log::warn!(
                "Row {}: number '{}' appears more than once and can win only once",
                row + 2,
                entry.identifier
            );
        }
    }

    log::debug!("Read {} roster entries", entries.len());
    Ok(entries)
}

/// Read roster entries from a CSV file
pub fn read_roster_file(path: &Path, layout: &ColumnLayout) -> Result<Vec<Entry>> {
    let file = std::fs::File::open(path)?;
    read_roster(file, layout)
}
