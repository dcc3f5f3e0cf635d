use crate::error::Result;
use crate::model::{Entry, WinnerSet};
use regex::Regex;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;

/// Excel's limit on worksheet name length
const MAX_SHEET_NAME_LEN: usize = 31;

/// Write a draw to an Excel file: a summary sheet followed by one sheet per location
pub fn write_winners_to_xlsx(winners: &WinnerSet, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let mut used_names = HashSet::new();

    let summary_name = unique_sheet_name("Summary", &mut used_names);
    let summary = workbook.add_worksheet();
    write_summary_sheet(summary, winners, &summary_name)?;

    for (location, list) in winners.iter() {
        let name = unique_sheet_name(location, &mut used_names);
        let sheet = workbook.add_worksheet();
        write_location_sheet(sheet, list, &name)?;
    }

    workbook.save(path)?;
    log::info!("Wrote {} location sheets to {}", winners.len(), path.display());
    Ok(())
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin)
}

/// Winner counts per location
fn write_summary_sheet(sheet: &mut Worksheet, winners: &WinnerSet, name: &str) -> Result<()> {
    sheet.set_column_width(0, 24)?; // Location
    sheet.set_column_width(1, 10)?; // Winners

    let header_format = header_format();
    for (col, header) in ["Location", "Winners"].iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let center_format = Format::new().set_align(FormatAlign::Center);
    for (row_idx, (location, list)) in winners.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        sheet.write_string(row, 0, location)?;
        sheet.write_number_with_format(row, 1, list.len() as f64, &center_format)?;
    }

    let total_row = (winners.len() + 1) as u32;
    let bold = Format::new().set_bold();
    sheet.write_string_with_format(total_row, 0, "Total", &bold)?;
    sheet.write_number_with_format(total_row, 1, winners.total_entries() as f64, &bold)?;

    sheet.set_name(name)?;
    Ok(())
}

/// One location's winners, in the same column order as the CSV export
fn write_location_sheet(sheet: &mut Worksheet, winners: &[Entry], name: &str) -> Result<()> {
    sheet.set_column_width(0, 24)?; // Name
    sheet.set_column_width(1, 10)?; // Number
    sheet.set_column_width(2, 20)?; // Department
    sheet.set_column_width(3, 20)?; // Location

    let header_format = header_format();
    let headers = ["Name", "Number", "Department", "Location"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let center_format = Format::new().set_align(FormatAlign::Center);
    for (row_idx, winner) in winners.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        sheet.write_string(row, 0, &winner.name)?;
        // Identifiers stay text so leading zeros survive
        sheet.write_string_with_format(row, 1, &winner.identifier, &center_format)?;
        sheet.write_string(row, 2, &winner.department)?;
        sheet.write_string(row, 3, &winner.location)?;
    }

    if !winners.is_empty() {
        sheet.autofilter(0, 0, winners.len() as u32, (headers.len() - 1) as u16)?;
    }

    sheet.set_name(name)?;
    Ok(())
}

/// Turn a location into a valid, unused worksheet name.
///
/// Excel rejects `[]:*?/\`, leading or trailing apostrophes, blank names,
/// names over 31 characters and case-insensitive duplicates.
fn unique_sheet_name(location: &str, used: &mut HashSet<String>) -> String {
    lazy_static::lazy_static! {
        static ref INVALID_CHARS: Regex = Regex::new(r"[\[\]:*?/\\]").unwrap();
    }

    let cleaned = INVALID_CHARS.replace_all(location, "_");
    let cleaned = cleaned.trim().trim_matches('\'');
    let base: String = if cleaned.is_empty() {
        "(blank)".to_string()
    } else {
        cleaned.chars().take(MAX_SHEET_NAME_LEN).collect()
    };

    let mut candidate = base.clone();
    let mut n = 2;
    while used.contains(&candidate.to_lowercase()) || candidate.eq_ignore_ascii_case("History") {
        let suffix = format!(" ({})", n);
        let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
        candidate = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
        n += 1;
    }

    used.insert(candidate.to_lowercase());
    candidate
}
