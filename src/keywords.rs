//! Keyword Dictionary
//!
//! Fixed keyword → class table run against the quick-flow dream narrative.
//! Matching is a case-insensitive substring test on the raw text. A class is
//! reported at most once however many of its keywords appear.

use std::collections::BTreeMap;

use archetype_types::ArchetypeClass;
use serde::Deserialize;

use crate::error::CatalogError;

const KEYWORDS_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeywordFile {
    version: u32,
    keywords: BTreeMap<ArchetypeClass, Vec<String>>,
}

/// Immutable keyword table, ordered by declared class order
#[derive(Debug, Clone, Default)]
pub struct KeywordDictionary {
    entries: BTreeMap<ArchetypeClass, Vec<String>>,
}

impl KeywordDictionary {
    /// Dictionary that never matches
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse and validate `keywords.yaml`
    pub fn from_yaml_str(yaml: &str, origin: &str) -> Result<Self, CatalogError> {
        let file: KeywordFile =
            serde_yaml::from_str(yaml).map_err(|source| CatalogError::Parse {
                origin: origin.to_string(),
                source,
            })?;
        if file.version != KEYWORDS_VERSION {
            return Err(CatalogError::UnsupportedVersion {
                origin: origin.to_string(),
                found: file.version,
                expected: KEYWORDS_VERSION,
            });
        }
        let dictionary = Self::new(file.keywords)?;
        tracing::info!(
            origin,
            classes = dictionary.entries.len(),
            keywords = dictionary.len(),
            "Loaded keyword dictionary"
        );
        Ok(dictionary)
    }

    /// Validate keywords: non-blank, lowercase, no surrounding whitespace
    pub fn new(entries: BTreeMap<ArchetypeClass, Vec<String>>) -> Result<Self, CatalogError> {
        for (class, keywords) in &entries {
            for keyword in keywords {
                let reason = if keyword.trim().is_empty() {
                    Some("keyword must not be blank")
                } else if keyword.trim() != keyword {
                    Some("keyword must not have surrounding whitespace")
                } else if keyword.to_lowercase() != *keyword {
                    Some("keyword must be lowercase")
                } else {
                    None
                };
                if let Some(reason) = reason {
                    return Err(CatalogError::InvalidKeyword {
                        class: *class,
                        keyword: keyword.clone(),
                        reason,
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    /// Total keyword count
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keywords_for(&self, class: ArchetypeClass) -> &[String] {
        self.entries.get(&class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Classes with at least one keyword in `text`, in declared order
    pub fn matches(&self, text: &str) -> Vec<ArchetypeClass> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let haystack = text.to_lowercase();
        self.entries
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k.as_str())))
            .map(|(class, _)| *class)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DataFile, DataSource};

    fn builtin() -> KeywordDictionary {
        let data = DataSource::embedded().read(DataFile::Keywords).unwrap();
        KeywordDictionary::from_yaml_str(&data.text, &data.origin).unwrap()
    }

    #[test]
    fn test_builtin_covers_every_class() {
        let dictionary = builtin();
        for class in ArchetypeClass::ALL {
            assert!(
                !dictionary.keywords_for(class).is_empty(),
                "no keywords for {}",
                class
            );
        }
    }

    #[test]
    fn test_matches_case_insensitive_substring() {
        let dictionary = builtin();
        assert_eq!(
            dictionary.matches("I dreamt of a KISS under the stars"),
            vec![ArchetypeClass::Lover]
        );
        assert_eq!(
            dictionary.matches("Soñé con un beso y una batalla"),
            vec![ArchetypeClass::Hero, ArchetypeClass::Lover]
        );
    }

    #[test]
    fn test_class_reported_once() {
        let dictionary = builtin();
        let matched = dictionary.matches("love, a kiss, an embrace, my lover");
        assert_eq!(matched, vec![ArchetypeClass::Lover]);
    }

    #[test]
    fn test_no_match_and_blank_text() {
        let dictionary = builtin();
        assert!(dictionary.matches("").is_empty());
        assert!(dictionary.matches("   ").is_empty());
        assert!(dictionary.matches("nothing relevant here").is_empty());
        assert!(KeywordDictionary::empty().matches("kiss").is_empty());
    }

    #[test]
    fn test_rejects_uppercase_keyword() {
        let mut entries = BTreeMap::new();
        entries.insert(ArchetypeClass::Sage, vec!["Book".to_string()]);
        let err = KeywordDictionary::new(entries).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidKeyword { .. }));
    }

    #[test]
    fn test_rejects_blank_keyword() {
        let mut entries = BTreeMap::new();
        entries.insert(ArchetypeClass::Sage, vec![" ".to_string()]);
        assert!(KeywordDictionary::new(entries).is_err());
    }
}
