//! Request header storage

/// Request headers keyed by field name.
///
/// Each entry is kept as a ready-to-send `"Field: Value"` line. Field names
/// are compared case-sensitively and a second insert for the same field
/// replaces the first while keeping its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, value: &str) {
        let line = format!("{}: {}", field, value);
        match self.entries.iter_mut().find(|(f, _)| f == field) {
            Some(entry) => entry.1 = line,
            None => self.entries.push((field.to_string(), line)),
        }
    }

    /// The stored line for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, line)| line.as_str())
    }

    /// The value part of the stored line for `field`.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.get(field).map(|line| &line[field.len() + 2..])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Header lines in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, line)| line.as_str())
    }

    /// `(field, value)` pairs in insertion order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(field, line)| (field.as_str(), &line[field.len() + 2..]))
    }
}
