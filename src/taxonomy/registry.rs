//! Taxonomy Registry
//!
//! Immutable catalog of the 12 archetype records, built once from
//! `archetypes.yaml` and validated at load.
//!
//! Two lookup families:
//! - typed lookups take an [`ArchetypeClass`] and cannot miss
//! - `*_for(key)` lookups take a raw string key and never fail: an unknown key
//!   echoes back as its own name, renders in neutral gray and has no traits

use std::collections::HashSet;

use archetype_types::{ArchetypeClass, Lang};
use serde::Deserialize;

use super::record::{is_hex_color, ArchetypeRecord};
use crate::error::CatalogError;

/// Neutral gray for unknown keys
pub const FALLBACK_COLOR: &str = "#9E9E9E";
/// Dark-theme neutral gray for unknown keys
pub const FALLBACK_DARK_COLOR: &str = "#616161";

const TAXONOMY_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaxonomyFile {
    version: u32,
    archetypes: Vec<ArchetypeRecord>,
}

/// Read-only registry of archetype metadata
#[derive(Debug, Clone)]
pub struct TaxonomyRegistry {
    /// Indexed by `ArchetypeClass::index()`
    records: Vec<ArchetypeRecord>,
}

impl TaxonomyRegistry {
    /// Parse and validate `archetypes.yaml`
    pub fn from_yaml_str(yaml: &str, origin: &str) -> Result<Self, CatalogError> {
        let file: TaxonomyFile =
            serde_yaml::from_str(yaml).map_err(|source| CatalogError::Parse {
                origin: origin.to_string(),
                source,
            })?;
        if file.version != TAXONOMY_VERSION {
            return Err(CatalogError::UnsupportedVersion {
                origin: origin.to_string(),
                found: file.version,
                expected: TAXONOMY_VERSION,
            });
        }
        let registry = Self::from_records(file.archetypes)?;
        tracing::info!(origin, archetypes = registry.len(), "Loaded archetype taxonomy");
        Ok(registry)
    }

    /// Validate records and build the registry.
    ///
    /// Records must list all 12 classes exactly once, in declared order.
    pub fn from_records(records: Vec<ArchetypeRecord>) -> Result<Self, CatalogError> {
        if records.len() != ArchetypeClass::COUNT {
            return Err(CatalogError::ArchetypeCount {
                expected: ArchetypeClass::COUNT,
                found: records.len(),
            });
        }
        for (position, (record, expected)) in
            records.iter().zip(ArchetypeClass::ALL.iter()).enumerate()
        {
            if record.class != *expected {
                return Err(CatalogError::ArchetypeOrder {
                    position,
                    expected: *expected,
                    found: record.class,
                });
            }
            validate_record(record)?;
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in declared order
    pub fn iter(&self) -> impl Iterator<Item = &ArchetypeRecord> + '_ {
        self.records.iter()
    }

    pub fn record(&self, class: ArchetypeClass) -> &ArchetypeRecord {
        &self.records[class.index()]
    }

    // ------------------------------------------------------------------------
    // Typed lookups
    // ------------------------------------------------------------------------

    pub fn name(&self, class: ArchetypeClass, lang: Lang) -> &str {
        self.record(class).name.get(lang)
    }

    pub fn tagline(&self, class: ArchetypeClass, lang: Lang) -> &str {
        self.record(class).tagline.get(lang)
    }

    pub fn description(&self, class: ArchetypeClass, lang: Lang) -> &str {
        self.record(class).description.get(lang)
    }

    pub fn long_description(&self, class: ArchetypeClass, lang: Lang) -> &str {
        self.record(class).long_description.get(lang)
    }

    pub fn traits(&self, class: ArchetypeClass, lang: Lang) -> &[String] {
        self.record(class).traits.get(lang)
    }

    pub fn color(&self, class: ArchetypeClass) -> &str {
        &self.record(class).color
    }

    pub fn dark_color(&self, class: ArchetypeClass) -> &str {
        &self.record(class).dark_color
    }

    pub fn compatible(&self, class: ArchetypeClass) -> &[ArchetypeClass] {
        &self.record(class).compatible
    }

    // ------------------------------------------------------------------------
    // Fail-soft lookups by raw key
    // ------------------------------------------------------------------------

    fn resolve(&self, key: &str) -> Option<ArchetypeClass> {
        let class = ArchetypeClass::parse_lenient(key);
        if class.is_none() {
            tracing::debug!(key, "Unknown archetype key, using fallback values");
        }
        class
    }

    /// Localized name, or the raw key itself when unknown
    pub fn name_for<'a>(&'a self, key: &'a str, lang: Lang) -> &'a str {
        match self.resolve(key) {
            Some(class) => self.name(class, lang),
            None => key,
        }
    }

    pub fn tagline_for(&self, key: &str, lang: Lang) -> &str {
        match self.resolve(key) {
            Some(class) => self.tagline(class, lang),
            None => "",
        }
    }

    pub fn description_for(&self, key: &str, lang: Lang) -> &str {
        match self.resolve(key) {
            Some(class) => self.description(class, lang),
            None => "",
        }
    }

    pub fn long_description_for(&self, key: &str, lang: Lang) -> &str {
        match self.resolve(key) {
            Some(class) => self.long_description(class, lang),
            None => "",
        }
    }

    pub fn traits_for(&self, key: &str, lang: Lang) -> &[String] {
        match self.resolve(key) {
            Some(class) => self.traits(class, lang),
            None => &[],
        }
    }

    pub fn color_for(&self, key: &str) -> &str {
        match self.resolve(key) {
            Some(class) => self.color(class),
            None => FALLBACK_COLOR,
        }
    }

    pub fn dark_color_for(&self, key: &str) -> &str {
        match self.resolve(key) {
            Some(class) => self.dark_color(class),
            None => FALLBACK_DARK_COLOR,
        }
    }

    pub fn compatible_for(&self, key: &str) -> &[ArchetypeClass] {
        match self.resolve(key) {
            Some(class) => self.compatible(class),
            None => &[],
        }
    }
}

fn validate_record(record: &ArchetypeRecord) -> Result<(), CatalogError> {
    let class = record.class;
    let owner = || format!("Archetype '{}'", class);

    let texts = [
        ("name", &record.name),
        ("tagline", &record.tagline),
        ("description", &record.description),
        ("long_description", &record.long_description),
    ];
    for (field, text) in texts {
        if !text.has_english() {
            return Err(CatalogError::MissingEnglish {
                owner: owner(),
                field,
            });
        }
    }
    if !record.traits.has_english() {
        return Err(CatalogError::MissingEnglish {
            owner: owner(),
            field: "traits",
        });
    }

    for (field, value) in [("color", &record.color), ("dark_color", &record.dark_color)] {
        if !is_hex_color(value) {
            return Err(CatalogError::InvalidColor {
                class,
                field,
                value: value.clone(),
            });
        }
    }

    let compatible = &record.compatible;
    if !(2..=3).contains(&compatible.len()) {
        return Err(CatalogError::InvalidCompatibility {
            class,
            reason: format!("expected 2-3 entries, found {}", compatible.len()),
        });
    }
    if compatible.contains(&class) {
        return Err(CatalogError::InvalidCompatibility {
            class,
            reason: "an archetype cannot be compatible with itself".to_string(),
        });
    }
    let distinct: HashSet<_> = compatible.iter().collect();
    if distinct.len() != compatible.len() {
        return Err(CatalogError::InvalidCompatibility {
            class,
            reason: "duplicate entries".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DataFile, DataSource};
    use crate::taxonomy::record::{LocalizedList, LocalizedText};

    fn builtin() -> TaxonomyRegistry {
        let data = DataSource::embedded().read(DataFile::Archetypes).unwrap();
        TaxonomyRegistry::from_yaml_str(&data.text, &data.origin).unwrap()
    }

    fn record(class: ArchetypeClass) -> ArchetypeRecord {
        ArchetypeRecord {
            class,
            name: LocalizedText::new(class.as_str()),
            tagline: LocalizedText::new("tagline"),
            description: LocalizedText::new("description"),
            long_description: LocalizedText::new("long description"),
            traits: LocalizedList::new(vec!["Trait".to_string()]),
            color: "#112233".to_string(),
            dark_color: "#001122".to_string(),
            compatible: ArchetypeClass::ALL
                .iter()
                .copied()
                .filter(|c| *c != class)
                .take(2)
                .collect(),
        }
    }

    fn all_records() -> Vec<ArchetypeRecord> {
        ArchetypeClass::ALL.iter().map(|c| record(*c)).collect()
    }

    #[test]
    fn test_builtin_taxonomy_loads() {
        let registry = builtin();
        assert_eq!(registry.len(), 12);
        for class in ArchetypeClass::ALL {
            assert!(!registry.name(class, Lang::En).is_empty());
            assert!(!registry.name(class, Lang::Es).is_empty());
            assert!(!registry.traits(class, Lang::Es).is_empty());
            assert!(!registry.compatible(class).is_empty());
        }
    }

    #[test]
    fn test_builtin_compatibility_edges_are_valid() {
        let registry = builtin();
        for record in registry.iter() {
            assert!(!record.compatible.contains(&record.class));
            assert!((2..=3).contains(&record.compatible.len()));
        }
    }

    #[test]
    fn test_typed_lookups() {
        let registry = builtin();
        assert_eq!(registry.name(ArchetypeClass::Sage, Lang::En), "The Sage");
        assert_eq!(registry.name(ArchetypeClass::Sage, Lang::Es), "El Sabio");
        assert_eq!(registry.color(ArchetypeClass::Explorer), "#2E8B57");
        assert_eq!(registry.dark_color(ArchetypeClass::Explorer), "#1B5E3A");
    }

    #[test]
    fn test_unknown_key_fallbacks() {
        let registry = builtin();
        assert_eq!(registry.name_for("wizard", Lang::En), "wizard");
        assert_eq!(registry.color_for("wizard"), FALLBACK_COLOR);
        assert_eq!(registry.dark_color_for("wizard"), FALLBACK_DARK_COLOR);
        assert!(registry.traits_for("wizard", Lang::Es).is_empty());
        assert!(registry.compatible_for("wizard").is_empty());
        assert_eq!(registry.description_for("", Lang::En), "");
        assert_eq!(registry.tagline_for("???", Lang::En), "");
    }

    #[test]
    fn test_known_key_lookups_are_case_insensitive() {
        let registry = builtin();
        assert_eq!(registry.name_for("LOVER", Lang::Es), "El Amante");
        assert_eq!(registry.color_for("lover"), registry.color(ArchetypeClass::Lover));
    }

    #[test]
    fn test_rejects_wrong_count() {
        let mut records = all_records();
        records.pop();
        let err = TaxonomyRegistry::from_records(records).unwrap_err();
        assert!(matches!(err, CatalogError::ArchetypeCount { found: 11, .. }));
    }

    #[test]
    fn test_rejects_out_of_order() {
        let mut records = all_records();
        records.swap(0, 1);
        let err = TaxonomyRegistry::from_records(records).unwrap_err();
        assert!(matches!(err, CatalogError::ArchetypeOrder { position: 0, .. }));
    }

    #[test]
    fn test_rejects_self_compatibility() {
        let mut records = all_records();
        records[3].compatible = vec![ArchetypeClass::Outlaw, ArchetypeClass::Hero];
        let err = TaxonomyRegistry::from_records(records).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCompatibility { .. }));
    }

    #[test]
    fn test_rejects_empty_compatibility() {
        let mut records = all_records();
        records[5].compatible.clear();
        let err = TaxonomyRegistry::from_records(records).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCompatibility { .. }));
    }

    #[test]
    fn test_rejects_bad_color_and_missing_english() {
        let mut records = all_records();
        records[0].color = "green".to_string();
        assert!(matches!(
            TaxonomyRegistry::from_records(records).unwrap_err(),
            CatalogError::InvalidColor { .. }
        ));

        let mut records = all_records();
        records[2].tagline = LocalizedText::default().with(Lang::Es, "solo español");
        assert!(matches!(
            TaxonomyRegistry::from_records(records).unwrap_err(),
            CatalogError::MissingEnglish { field: "tagline", .. }
        ));
    }

    #[test]
    fn test_rejects_unknown_class_key_in_yaml() {
        let yaml = "version: 1\narchetypes:\n  - class: wizard\n";
        let err = TaxonomyRegistry::from_yaml_str(yaml, "test").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }
}
