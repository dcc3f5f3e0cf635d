use std::fmt;

/// One roster row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// Participant number, used to keep a person from winning twice
    pub identifier: String,
    pub name: String,
    pub location: String,
    pub department: String,
}

impl Entry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.identifier)?;
        if !self.department.is_empty() {
            write!(f, " ({})", self.department)?;
        }
        Ok(())
    }
}

/// Zero-based column positions of the fields an [`Entry`] is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub identifier: usize,
    pub name: usize,
    pub location: usize,
    pub department: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            identifier: 2,
            name: 3,
            location: 4,
            department: 5,
        }
    }
}

impl ColumnLayout {
    /// Build an entry from a row of fields. Missing columns become empty strings.
    pub fn entry_from_fields<'a, I>(&self, fields: I) -> Entry
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().collect();
        let field = |idx: usize| fields.get(idx).copied().unwrap_or("").to_string();

        Entry {
            identifier: field(self.identifier),
            name: field(self.name),
            location: field(self.location),
            department: field(self.department),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_reads_positional_fields() {
        let row = ["2024-01-01", "x", "1042", "Ada Lovelace", "Leeds", "Engineering"];
        let entry = ColumnLayout::default().entry_from_fields(row);

        assert_eq!(entry.identifier, "1042");
        assert_eq!(entry.name, "Ada Lovelace");
        assert_eq!(entry.location, "Leeds");
        assert_eq!(entry.department, "Engineering");
    }

    #[test]
    fn test_short_row_yields_empty_fields() {
        let row = ["a", "b", "7"];
        let entry = ColumnLayout::default().entry_from_fields(row);

        assert_eq!(entry.identifier, "7");
        assert_eq!(entry.name, "");
        assert_eq!(entry.location, "");
        assert_eq!(entry.department, "");
    }

    #[test]
    fn test_custom_layout() {
        let layout = ColumnLayout {
            identifier: 0,
            name: 1,
            location: 2,
            department: 3,
        };
        let entry = layout.entry_from_fields(["9", "Grace", "York", "Ops"]);
        assert_eq!(
            entry,
            Entry::new()
                .with_identifier("9")
                .with_name("Grace")
                .with_location("York")
                .with_department("Ops")
        );
    }

    #[test]
    fn test_entry_display() {
        let entry = Entry::new()
            .with_identifier("12")
            .with_name("Alan")
            .with_department("Research");
        assert_eq!(entry.to_string(), "Alan - 12 (Research)");

        let bare = Entry::new().with_identifier("3").with_name("Bob");
        assert_eq!(bare.to_string(), "Bob - 3");
    }
}
