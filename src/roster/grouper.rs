use crate::model::{Entry, LocationGroups};

/// Partition entries by location, keeping roster order within each group.
/// Locations appear in order of first sight; an empty location is its own group.
pub fn group<I>(entries: I) -> LocationGroups
where
    I: IntoIterator<Item = Entry>,
{
    let mut groups = LocationGroups::new();
    for entry in entries {
        groups
            .get_or_insert_with(&entry.location, Vec::new)
            .push(entry);
    }
    groups
}
