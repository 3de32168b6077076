//! Presentation bundle for a classification result
//!
//! Gathers registry strings and colors for the result screen and share card.
//! No prose is computed here; every string comes from the registry.

use archetype_types::{ArchetypeClass, ClassificationResult, ConfidenceBand, Lang};
use serde::Serialize;

use super::registry::TaxonomyRegistry;

/// Full display card for the primary or secondary archetype
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchetypeCard {
    pub class: ArchetypeClass,
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub long_description: String,
    pub traits: Vec<String>,
    pub color: String,
    pub dark_color: String,
    /// Normalized score share, 0-100
    pub percent: u32,
}

/// Compact entry for rankings and compatibility lists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchetypeChip {
    pub class: ArchetypeClass,
    pub name: String,
    pub color: String,
    pub percent: u32,
}

/// Everything the result screen needs, in one language
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub lang: Lang,
    pub primary: ArchetypeCard,
    pub secondary: Option<ArchetypeCard>,
    /// Classes the primary pairs well with
    pub compatible: Vec<ArchetypeChip>,
    /// Top classes in rank order
    pub ranking: Vec<ArchetypeChip>,
    pub confidence: ConfidenceBand,
}

fn percent(share: f64) -> u32 {
    (share.clamp(0.0, 1.0) * 100.0).round() as u32
}

impl TaxonomyRegistry {
    pub fn card(&self, class: ArchetypeClass, lang: Lang, share: f64) -> ArchetypeCard {
        let record = self.record(class);
        ArchetypeCard {
            class,
            name: record.name.get(lang).to_string(),
            tagline: record.tagline.get(lang).to_string(),
            description: record.description.get(lang).to_string(),
            long_description: record.long_description.get(lang).to_string(),
            traits: record.traits.get(lang).to_vec(),
            color: record.color.clone(),
            dark_color: record.dark_color.clone(),
            percent: percent(share),
        }
    }

    pub fn chip(&self, class: ArchetypeClass, lang: Lang, share: f64) -> ArchetypeChip {
        ArchetypeChip {
            class,
            name: self.name(class, lang).to_string(),
            color: self.color(class).to_string(),
            percent: percent(share),
        }
    }

    /// Build the result-screen bundle.
    ///
    /// `top_n` limits the ranking; classes with zero score are left out unless
    /// the result is degenerate, in which case only the primary is listed.
    pub fn profile(&self, result: &ClassificationResult, lang: Lang, top_n: usize) -> ProfileView {
        let scores = &result.scores;
        let primary = self.card(result.primary, lang, scores.get(result.primary));
        let secondary = result
            .secondary
            .map(|class| self.card(class, lang, scores.get(class)));
        let compatible = self
            .compatible(result.primary)
            .iter()
            .map(|class| self.chip(*class, lang, scores.get(*class)))
            .collect();

        let ranking = if result.is_degenerate() {
            vec![self.chip(result.primary, lang, 0.0)]
        } else {
            result
                .ranked()
                .into_iter()
                .filter(|class| scores.get(*class) > 0.0)
                .take(top_n)
                .map(|class| self.chip(class, lang, scores.get(class)))
                .collect()
        };

        ProfileView {
            lang,
            primary,
            secondary,
            compatible,
            ranking,
            confidence: result.confidence,
        }
    }
}
