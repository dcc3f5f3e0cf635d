use super::entry::Entry;
use std::collections::HashMap;

/// Map keyed by location that iterates in first-insertion order
#[derive(Debug, Clone)]
pub struct LocationMap<T> {
    items: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

/// Roster entries grouped by location
pub type LocationGroups = LocationMap<Vec<Entry>>;

/// Final winners per location
pub type WinnerSet = LocationMap<Vec<Entry>>;

/// The candidate currently shown for each location while spinning
pub type SpinSnapshot = LocationMap<Entry>;

impl<T> LocationMap<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, location: &str) -> Option<&T> {
        self.index.get(location).map(|&i| &self.items[i].1)
    }

    pub fn contains(&self, location: &str) -> bool {
        self.index.contains_key(location)
    }

    /// Insert or replace the value for a location. A replaced location keeps its position.
    pub fn insert(&mut self, location: impl Into<String>, value: T) {
        let location = location.into();
        match self.index.get(&location) {
            Some(&i) => self.items[i].1 = value,
            None => {
                self.index.insert(location.clone(), self.items.len());
                self.items.push((location, value));
            }
        }
    }

    /// Get the value for a location, creating it with `make` on first sight
    pub fn get_or_insert_with(&mut self, location: &str, make: impl FnOnce() -> T) -> &mut T {
        let i = match self.index.get(location) {
            Some(&i) => i,
            None => {
                let i = self.items.len();
                self.index.insert(location.to_string(), i);
                self.items.push((location.to_string(), make()));
                i
            }
        };
        &mut self.items[i].1
    }

    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<T> Default for LocationMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for LocationMap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for LocationMap<T> {}

impl<T> IntoIterator for LocationMap<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl LocationMap<Vec<Entry>> {
    /// Total number of entries across all locations
    pub fn total_entries(&self) -> usize {
        self.items.iter().map(|(_, entries)| entries.len()).sum()
    }
}
