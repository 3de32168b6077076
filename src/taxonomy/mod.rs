//! Archetype Taxonomy
//!
//! Static catalog of the 12 archetype classes: localized names, taglines,
//! descriptions, trait summaries, display colors and compatibility edges.
//!
//! ```text
//! archetypes.yaml ──► TaxonomyRegistry ──► typed lookups (ArchetypeClass)
//!                          │
//!                          ├──► fail-soft lookups (raw string key)
//!                          └──► ProfileView (result screen / share card)
//! ```

mod profile;
mod record;
mod registry;

pub use profile::{ArchetypeCard, ArchetypeChip, ProfileView};
pub use record::{ArchetypeRecord, LocalizedList, LocalizedText};
pub use registry::{TaxonomyRegistry, FALLBACK_COLOR, FALLBACK_DARK_COLOR};
