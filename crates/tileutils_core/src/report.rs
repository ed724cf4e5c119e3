//! Summary of the tile names used by a tileset

use serde::Serialize;
use std::collections::BTreeMap;

use crate::TilesetDescriptor;

/// A tile name used by more than one tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateName {
    pub name: String,
    pub count: usize,
}

/// Sorted tile names of a tileset plus the names that repeat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileNameReport {
    pub tileset_name: String,
    /// Every tile name, sorted, duplicates kept
    pub names: Vec<String>,
    /// Repeated names, sorted by name
    pub duplicates: Vec<DuplicateName>,
}

impl TileNameReport {
    pub fn from_tileset(tileset: &TilesetDescriptor) -> Self {
        let mut names: Vec<String> = tileset
            .tiles()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        names.sort();

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for name in &names {
            *counts.entry(name.as_str()).or_default() += 1;
        }

        let duplicates = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, count)| DuplicateName {
                name: name.to_string(),
                count,
            })
            .collect();

        Self {
            tileset_name: tileset.name().to_string(),
            names,
            duplicates,
        }
    }

    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}
