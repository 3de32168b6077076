//! Archetype records and localized strings

use std::collections::BTreeMap;

use archetype_types::{ArchetypeClass, Lang};
use serde::{Deserialize, Serialize};

/// Per-language text. English is mandatory and is the fallback for every
/// other language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Lang, String>);

impl LocalizedText {
    pub fn new(english: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(Lang::En, english.into());
        Self(map)
    }

    pub fn with(mut self, lang: Lang, text: impl Into<String>) -> Self {
        self.0.insert(lang, text.into());
        self
    }

    /// Text in `lang`, or English when that translation is missing or blank
    pub fn get(&self, lang: Lang) -> &str {
        self.0
            .get(&lang)
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.0.get(&Lang::En))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn has_english(&self) -> bool {
        self.0
            .get(&Lang::En)
            .is_some_and(|s| !s.trim().is_empty())
    }
}

/// Per-language list of short strings (trait summaries)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedList(BTreeMap<Lang, Vec<String>>);

impl LocalizedList {
    pub fn new(english: Vec<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(Lang::En, english);
        Self(map)
    }

    pub fn get(&self, lang: Lang) -> &[String] {
        self.0
            .get(&lang)
            .filter(|items| !items.is_empty())
            .or_else(|| self.0.get(&Lang::En))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_english(&self) -> bool {
        self.0
            .get(&Lang::En)
            .is_some_and(|items| !items.is_empty() && items.iter().all(|s| !s.trim().is_empty()))
    }
}

/// Display metadata for one archetype class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchetypeRecord {
    pub class: ArchetypeClass,
    pub name: LocalizedText,
    pub tagline: LocalizedText,
    pub description: LocalizedText,
    pub long_description: LocalizedText,
    pub traits: LocalizedList,
    /// Primary display color, `#RRGGBB`
    pub color: String,
    /// Dark-theme display color, `#RRGGBB`
    pub dark_color: String,
    /// 2-3 other classes this one pairs well with
    pub compatible: Vec<ArchetypeClass>,
}

/// `#RRGGBB`
pub(crate) fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_text_falls_back_to_english() {
        let text = LocalizedText::new("The Sage").with(Lang::Es, "  ");
        assert_eq!(text.get(Lang::En), "The Sage");
        assert_eq!(text.get(Lang::Es), "The Sage");
    }

    #[test]
    fn test_localized_text_prefers_requested_language() {
        let text = LocalizedText::new("The Sage").with(Lang::Es, "El Sabio");
        assert_eq!(text.get(Lang::Es), "El Sabio");
        assert!(text.has_english());
        assert!(!LocalizedText::default().has_english());
    }

    #[test]
    fn test_localized_list_fallback() {
        let list = LocalizedList::new(vec!["Wise".to_string()]);
        assert_eq!(list.get(Lang::Es), &["Wise".to_string()]);
        assert!(LocalizedList::default().get(Lang::En).is_empty());
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#2E8B57"));
        assert!(is_hex_color("#abcdef"));
        assert!(!is_hex_color("2E8B57"));
        assert!(!is_hex_color("#2E8B5"));
        assert!(!is_hex_color("#GGGGGG"));
    }
}
