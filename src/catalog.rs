//! Catalog - the immutable data the engine classifies against
//!
//! Bundles the taxonomy registry, both question banks and the keyword
//! dictionary, and checks the cross-file invariants at load time:
//!
//! - each bank file declares the variant it is loaded as
//! - the full and quick banks share no question ids
//!
//! Score-map keys and compatibility edges are `ArchetypeClass` values, so an
//! unknown class key is already a parse error and the taxonomy is checked to
//! declare all 12 classes.

use std::collections::HashSet;

use archetype_types::QuizVariant;

use crate::config::{DataFile, DataSource};
use crate::error::CatalogError;
use crate::keywords::KeywordDictionary;
use crate::questions::QuestionBank;
use crate::taxonomy::TaxonomyRegistry;

/// Taxonomy + question banks + keyword dictionary
#[derive(Debug, Clone)]
pub struct Catalog {
    taxonomy: TaxonomyRegistry,
    full: QuestionBank,
    quick: QuestionBank,
    keywords: KeywordDictionary,
}

impl Catalog {
    /// Assemble a catalog from already-validated parts
    pub fn new(
        taxonomy: TaxonomyRegistry,
        full: QuestionBank,
        quick: QuestionBank,
        keywords: KeywordDictionary,
    ) -> Result<Self, CatalogError> {
        for (bank, expected) in [(&full, QuizVariant::Full), (&quick, QuizVariant::Quick)] {
            if bank.variant() != expected {
                return Err(CatalogError::VariantMismatch {
                    origin: "catalog".to_string(),
                    expected,
                    found: bank.variant(),
                });
            }
        }

        let full_ids: HashSet<&str> = full.ids().collect();
        if let Some(shared) = quick.ids().find(|id| full_ids.contains(id)) {
            return Err(CatalogError::SharedQuestionId {
                id: shared.to_string(),
            });
        }

        Ok(Self {
            taxonomy,
            full,
            quick,
            keywords,
        })
    }

    /// Catalog from the embedded data files
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::load(&DataSource::embedded())
    }

    /// Load every data file from `source` and validate
    pub fn load(source: &DataSource) -> Result<Self, CatalogError> {
        let read = |file: DataFile| {
            source
                .read(file)
                .map_err(|(path, source)| CatalogError::Io { path, source })
        };

        let data = read(DataFile::Archetypes)?;
        let taxonomy = TaxonomyRegistry::from_yaml_str(&data.text, &data.origin)?;

        let data = read(DataFile::FullQuestions)?;
        let full = QuestionBank::from_yaml_str(&data.text, QuizVariant::Full, &data.origin)?;

        let data = read(DataFile::QuickQuestions)?;
        let quick = QuestionBank::from_yaml_str(&data.text, QuizVariant::Quick, &data.origin)?;

        let data = read(DataFile::Keywords)?;
        let keywords = KeywordDictionary::from_yaml_str(&data.text, &data.origin)?;

        Self::new(taxonomy, full, quick, keywords)
    }

    pub fn taxonomy(&self) -> &TaxonomyRegistry {
        &self.taxonomy
    }

    pub fn bank(&self, variant: QuizVariant) -> &QuestionBank {
        match variant {
            QuizVariant::Full => &self.full,
            QuizVariant::Quick => &self.quick,
        }
    }

    pub fn keywords(&self) -> &KeywordDictionary {
        &self.keywords
    }
}
