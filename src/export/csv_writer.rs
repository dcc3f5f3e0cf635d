use crate::error::Result;
use crate::model::{Entry, WinnerSet};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Header line of every winners export
pub const WINNERS_HEADER: &str = "Name,Number,Department,Location";

#[derive(Serialize)]
struct WinnerRow<'a> {
    name: &'a str,
    number: &'a str,
    department: &'a str,
    location: &'a str,
}

impl<'a> From<&'a Entry> for WinnerRow<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            name: &entry.name,
            number: &entry.identifier,
            department: &entry.department,
            location: &entry.location,
        }
    }
}

/// File name for a location's export: `<location>_winners.csv`, with characters
/// that are not allowed in file names replaced by `_`
pub fn winners_file_name(location: &str) -> String {
    format!("{}_winners.csv", file_stem(location))
}

fn file_stem(location: &str) -> String {
    lazy_static::lazy_static! {
        static ref UNSAFE_CHARS: Regex = Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).unwrap();
    }
    UNSAFE_CHARS.replace_all(location, "_").into_owned()
}

/// File name for a location that does not clash with any name in `used`.
///
/// Locations that sanitize to the same stem get `_2`, `_3`, ... appended to
/// the stem. Names are compared case-insensitively.
fn unique_file_name(location: &str, used: &mut HashSet<String>) -> String {
    let stem = file_stem(location);
    let mut candidate = format!("{}_winners.csv", stem);
    let mut n = 2;
    while used.contains(&candidate.to_lowercase()) {
        candidate = format!("{}_{}_winners.csv", stem, n);
        n += 1;
    }
    used.insert(candidate.to_lowercase());
    candidate
}

/// Write winners as CSV: a plain header line, then one row per winner with
/// every field quoted
pub fn write_winners_csv<W: Write>(mut out: W, winners: &[Entry]) -> Result<()> {
    writeln!(out, "{}", WINNERS_HEADER)?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    for winner in winners {
        writer.serialize(WinnerRow::from(winner))?;
    }
    writer.flush()?;
    Ok(())
}

/// Export one location's winners into `dir`, returning the written path
pub fn export_location(dir: &Path, location: &str, winners: &[Entry]) -> Result<PathBuf> {
    write_location_file(dir.join(winners_file_name(location)), location, winners)
}

fn write_location_file(path: PathBuf, location: &str, winners: &[Entry]) -> Result<PathBuf> {
    let file = File::create(&path)?;
    write_winners_csv(BufWriter::new(file), winners)?;
    log::info!("Wrote {} winners for {} to {}", winners.len(), location, path.display());
    Ok(path)
}

/// Export every location of a draw into `dir`, one file per location.
/// Locations whose file names would clash get a numbered suffix.
pub fn export_all(dir: &Path, winners: &WinnerSet) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut used = HashSet::new();
    winners
        .iter()
        .map(|(location, list)| {
            let name = unique_file_name(location, &mut used);
            if name != winners_file_name(location) {
                log::warn!("File name for {} clashes with another location, writing {}", location, name);
            }
            write_location_file(dir.join(name), location, list)
        })
        .collect()
}
