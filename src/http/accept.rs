//! Accept-type registry

/// Maps logical content categories (`json`, `xml`, ...) to MIME strings.
///
/// Each builder owns its own registry; registering a key again replaces its
/// MIME type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptTypes {
    entries: Vec<(String, String)>,
}

impl AcceptTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: &str, mime: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = mime.to_string(),
            None => self.entries.push((key.to_string(), mime.to_string())),
        }
    }

    pub fn mime(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, mime)| mime.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.mime(key).is_some()
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for AcceptTypes
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut types = AcceptTypes::new();
        for (key, mime) in iter {
            types.register(key.as_ref(), mime.as_ref());
        }
        types
    }
}
