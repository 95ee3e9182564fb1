//! Selectable languages and the ordered catalogs that hold them.

use serde::{Deserialize, Serialize};

/// Reserved source code asking the backend to infer the language.
pub const AUTO_DETECT: &str = "auto";
pub const AUTO_DETECT_NAME: &str = "Detect language";

/// One selectable language. Serialized as `{ "language": code, "name": display }`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageEntry {
    #[serde(rename = "language")]
    pub code: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

impl LanguageEntry {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
        }
    }

    pub fn auto_detect() -> Self {
        Self::new(AUTO_DETECT, AUTO_DETECT_NAME)
    }

    pub fn is_auto_detect(&self) -> bool {
        self.code == AUTO_DETECT
    }
}

/// Ordered list of languages in server (or fallback) order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Catalog(Vec<LanguageEntry>);

impl Catalog {
    pub fn new(entries: Vec<LanguageEntry>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&LanguageEntry> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageEntry> {
        self.0.iter()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.find_by_code(code).is_some()
    }

    pub fn find_by_code(&self, code: &str) -> Option<&LanguageEntry> {
        self.0.iter().find(|e| e.code == code)
    }

    /// First entry whose display name matches exactly.
    pub fn find_by_name(&self, display_name: &str) -> Option<&LanguageEntry> {
        self.0.iter().find(|e| e.display_name == display_name)
    }

    /// Display name for `code`, or the code itself when unknown.
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.find_by_code(code)
            .map(|e| e.display_name.as_str())
            .unwrap_or(code)
    }

    /// Like [`Catalog::display_name`] but the sentinel always reads "Detect language".
    pub fn source_display_name<'a>(&'a self, code: &'a str) -> &'a str {
        if code == AUTO_DETECT {
            return AUTO_DETECT_NAME;
        }
        self.display_name(code)
    }
}

impl FromIterator<LanguageEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = LanguageEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![
            LanguageEntry::auto_detect(),
            LanguageEntry::new("en", "English"),
            LanguageEntry::new("ro", "Romanian"),
        ])
    }

    #[test]
    fn parses_wire_shape_in_order() {
        let body = r#"[{"language":"fr","name":"French"},{"language":"de","name":"German"}]"#;
        let catalog: Catalog = serde_json::from_str(body).expect("valid catalog");
        let codes: Vec<_> = catalog.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["fr", "de"]);
        assert_eq!(catalog.display_name("de"), "German");
    }

    #[test]
    fn display_name_falls_back_to_code() {
        let catalog = sample();
        assert_eq!(catalog.display_name("ro"), "Romanian");
        assert_eq!(catalog.display_name("xx"), "xx");
    }

    #[test]
    fn source_display_name_special_cases_sentinel() {
        assert_eq!(Catalog::default().source_display_name(AUTO_DETECT), "Detect language");
        assert_eq!(sample().source_display_name("en"), "English");
    }

    #[test]
    fn find_by_name_is_exact() {
        let catalog = sample();
        assert_eq!(catalog.find_by_name("English").map(|e| e.code.as_str()), Some("en"));
        assert!(catalog.find_by_name("english").is_none());
    }
}
