//! Plain-text rendering of spin snapshots and draw results

use crate::model::{LocationGroups, SpinSnapshot, WinnerSet};
use std::collections::HashSet;
use std::fmt::Write;

fn location_label(location: &str) -> &str {
    if location.is_empty() {
        "(no location)"
    } else {
        location
    }
}

/// One line per location: `location: name - number (department)`
pub fn format_snapshot(snapshot: &SpinSnapshot) -> String {
    let mut out = String::new();
    for (location, entry) in snapshot.iter() {
        let _ = writeln!(out, "{}: {}", location_label(location), entry);
    }
    out
}

/// Numbered winner lists, one block per location
pub fn format_winners(winners: &WinnerSet) -> String {
    let mut out = String::new();
    for (location, list) in winners.iter() {
        let _ = writeln!(out, "{} ({} winners)", location_label(location), list.len());
        if list.is_empty() {
            let _ = writeln!(out, "  (no eligible entries)");
        }
        for (i, winner) in list.iter().enumerate() {
            let _ = writeln!(out, "  {:>2}. {}", i + 1, winner);
        }
        out.push('\n');
    }
    out
}

/// Roster overview: entry count and, per location, entries and distinct identifiers
pub fn format_roster_info(groups: &LocationGroups) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Entries: {}", groups.total_entries());
    let _ = writeln!(out, "Locations: {}", groups.len());
    for (location, entries) in groups.iter() {
        let distinct: HashSet<&str> = entries.iter().map(|e| e.identifier.as_str()).collect();
        let _ = writeln!(
            out,
            "  {}: {} entries, {} distinct numbers",
            location_label(location),
            entries.len(),
            distinct.len()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entry;
    use crate::roster::group;

    fn entry(id: &str, name: &str, location: &str) -> Entry {
        Entry::new()
            .with_identifier(id)
            .with_name(name)
            .with_location(location)
            .with_department("Sales")
    }

    #[test]
    fn test_format_snapshot() {
        let mut snapshot = SpinSnapshot::new();
        snapshot.insert("Leeds", entry("3", "Ada", "Leeds"));
        snapshot.insert("", entry("9", "Bob", ""));

        assert_eq!(
            format_snapshot(&snapshot),
            "Leeds: Ada - 3 (Sales)\n(no location): Bob - 9 (Sales)\n"
        );
    }

    #[test]
    fn test_format_winners() {
        let mut winners = WinnerSet::new();
        winners.insert("York", vec![entry("1", "Ann", "York"), entry("2", "Ben", "York")]);
        winners.insert("Hull", vec![]);

        let text = format_winners(&winners);
        assert!(text.starts_with("York (2 winners)\n   1. Ann - 1 (Sales)\n   2. Ben - 2 (Sales)\n"));
        assert!(text.contains("Hull (0 winners)\n  (no eligible entries)\n"));
    }

    #[test]
    fn test_format_roster_info() {
        let groups = group(vec![
            entry("1", "Ann", "York"),
            entry("1", "Ann again", "York"),
            entry("2", "Ben", "Hull"),
        ]);
        let text = format_roster_info(&groups);
        assert!(text.contains("Entries: 3\n"));
        assert!(text.contains("Locations: 2\n"));
        assert!(text.contains("  York: 2 entries, 1 distinct numbers\n"));
    }
}
