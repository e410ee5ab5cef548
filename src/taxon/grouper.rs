//! Order → Family → Genus grouping of a normalized table.
use crate::error::{CrateError, Result};
use crate::taxon::normalizer::NormalizedTable;
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

/// Genera of one family, each with its species display lines in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FamilyGroup {
    pub genera: IndexMap<String, Vec<String>>,
}

impl FamilyGroup {
    pub fn species_count(&self) -> usize {
        self.genera.values().map(Vec::len).sum()
    }
}

/// The families of a single Order, keyed in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomyTree {
    pub order: String,
    pub families: IndexMap<String, FamilyGroup>,
}

impl TaxonomyTree {
    pub fn species_count(&self) -> usize {
        self.families.values().map(FamilyGroup::species_count).sum()
    }
}

/// First whitespace-separated token of a binomial name.
///
/// A name without whitespace is its own genus.
pub fn split_genus(species_scientific: &str) -> &str {
    species_scientific
        .split_whitespace()
        .next()
        .unwrap_or("")
}

/// Removes the first occurrence of `genus` from the display name and trims the
/// ends. Internal spacing is kept. A display name that never mentions the
/// genus comes back trimmed but otherwise unchanged.
pub fn species_display_line(fish: &str, genus: &str) -> String {
    if genus.is_empty() {
        return fish.trim().to_string();
    }
    match fish.find(genus) {
        Some(start) => {
            let mut line = String::with_capacity(fish.len() - genus.len());
            line.push_str(&fish[..start]);
            line.push_str(&fish[start + genus.len()..]);
            line.trim().to_string()
        }
        None => fish.trim().to_string(),
    }
}

/// Groups the rows of `order` into Family → Genus → species display lines.
///
/// Keys keep the order in which they first appear in the table. Fails with
/// [`CrateError::UnknownOrder`] when no row belongs to `order`.
pub fn group_by_taxonomy(table: &NormalizedTable, order: &str) -> Result<TaxonomyTree> {
    let mut families: IndexMap<String, FamilyGroup> = IndexMap::new();

    for record in table.records().iter().filter(|r| r.order == order) {
        let genus = split_genus(&record.species_scientific);
        let line = species_display_line(&record.fish, genus);
        families
            .entry(record.family.clone())
            .or_default()
            .genera
            .entry(genus.to_string())
            .or_default()
            .push(line);
    }

    if families.is_empty() {
        return Err(CrateError::UnknownOrder(order.to_string()));
    }

    debug!("Order {} groups into {} families", order, families.len());
    Ok(TaxonomyTree {
        order: order.to_string(),
        families,
    })
}
