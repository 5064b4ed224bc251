use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Translation data carried by a record: translation key -> language code -> value.
///
/// Language codes are kept as raw strings until negotiation resolves them.
/// An empty table, or a key with an empty language map, is valid data and
/// means "nothing to show" rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationTable(HashMap<String, HashMap<String, String>>);

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value for `key` in language `lang`.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        lang: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.0
            .entry(key.into())
            .or_default()
            .insert(lang.into(), value.into());
        self
    }

    /// Drop the stored value for `key` in language `lang`, keeping the key
    /// itself so its (possibly emptied) language map stays observable.
    pub fn remove(&mut self, key: &str, lang: &str) {
        if let Some(entries) = self.0.get_mut(key) {
            entries.remove(lang);
        }
    }

    pub fn get(&self, key: &str, lang: &str) -> Option<&str> {
        self.0.get(key).and_then(|entries| entries.get(lang)).map(String::as_str)
    }

    /// Language map for one translation key.
    pub fn entries(&self, key: &str) -> Option<&HashMap<String, String>> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashMap<String, String>)> {
        self.0.iter().map(|(key, entries)| (key.as_str(), entries))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Encode as the two-level JSON object used for persistence.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from the two-level JSON object used for persistence.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut table = TranslationTable::new();
        table.set("name", "en", "John").set("name", "ru", "Джон");

        assert_eq!(table.get("name", "en"), Some("John"));
        assert_eq!(table.get("name", "ru"), Some("Джон"));
        assert_eq!(table.get("name", "ja"), None);
        assert_eq!(table.get("element", "en"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_keeps_key() {
        let mut table = TranslationTable::new();
        table.set("name", "en", "John");
        table.remove("name", "en");

        assert_eq!(table.get("name", "en"), None);
        // The key survives with an empty language map.
        assert!(table.entries("name").is_some_and(|entries| entries.is_empty()));
        assert!(!table.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let mut table = TranslationTable::new();
        table
            .set("name", "en", "John")
            .set("name", "ru", "Джон")
            .set("element", "en", "water");

        let encoded = table.to_json().unwrap();
        let decoded = TranslationTable::from_json(&encoded).unwrap();
        assert_eq!(table, decoded);
    }

    #[test]
    fn test_json_round_trip_empty_states() {
        let empty = TranslationTable::new();
        let decoded = TranslationTable::from_json(&empty.to_json().unwrap()).unwrap();
        assert_eq!(empty, decoded);
        assert_eq!(empty.to_json().unwrap(), "{}");

        // A present key with no languages survives the round trip too.
        let mut emptied = TranslationTable::new();
        emptied.set("name", "en", "John");
        emptied.remove("name", "en");
        let decoded = TranslationTable::from_json(&emptied.to_json().unwrap()).unwrap();
        assert_eq!(emptied, decoded);
        assert!(decoded.entries("name").is_some_and(|entries| entries.is_empty()));
    }

    #[test]
    fn test_decode_plain_json_object() {
        let decoded = TranslationTable::from_json(
            r#"{"name":{"en":"John","ru":"Джон"},"element":{}}"#,
        )
        .unwrap();

        assert_eq!(decoded.get("name", "en"), Some("John"));
        assert!(decoded.entries("element").is_some_and(|entries| entries.is_empty()));
    }
}
