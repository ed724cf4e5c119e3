//! Tileset descriptor with a single backing image

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised when assembling a descriptor from its parts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("duplicate tile id {0}")]
    DuplicateTileId(u32),
    #[error("tile {0} has an empty name")]
    EmptyTileName(u32),
    #[error("tile size must be positive, got {width}x{height}")]
    ZeroTileSize { width: u32, height: u32 },
    #[error("{field} contains {character:?}, which XML cannot represent")]
    InvalidCharacter { field: String, character: char },
}

/// Characters allowed by the XML 1.0 `Char` production
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}')
        || c >= '\u{10000}'
}

fn check_xml_text(field: impl FnOnce() -> String, value: &str) -> Result<(), DescriptorError> {
    match value.chars().find(|&c| !is_xml_char(c)) {
        Some(character) => Err(DescriptorError::InvalidCharacter {
            field: field(),
            character,
        }),
        None => Ok(()),
    }
}

/// A single tile: its id and semantic name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRecord {
    id: u32,
    name: String,
}

impl TileRecord {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The sprite sheet a tileset is cut from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetImage {
    /// Path to the image, relative to the descriptor file
    pub source: String,
    /// Declared width in pixels
    pub width: u32,
    /// Declared height in pixels
    pub height: u32,
}

impl TilesetImage {
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
        }
    }
}

/// A loaded tileset: uniform tile size, one image, and the named tiles.
///
/// Built once through [`TilesetDescriptor::new`] and read-only afterwards.
/// Tiles keep their declared order; lookups by id go through an index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawTileset")]
pub struct TilesetDescriptor {
    name: String,
    tile_width: u32,
    tile_height: u32,
    image: TilesetImage,
    tiles: Vec<TileRecord>,
    #[serde(skip)]
    index: HashMap<u32, usize>,
}

// Mirror used to route deserialization through the checked constructor
#[derive(Deserialize)]
struct RawTileset {
    name: String,
    tile_width: u32,
    tile_height: u32,
    image: TilesetImage,
    #[serde(default)]
    tiles: Vec<TileRecord>,
}

impl TryFrom<RawTileset> for TilesetDescriptor {
    type Error = DescriptorError;

    fn try_from(raw: RawTileset) -> Result<Self, Self::Error> {
        TilesetDescriptor::new(raw.name, raw.tile_width, raw.tile_height, raw.image, raw.tiles)
    }
}

impl PartialEq for TilesetDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.tile_width == other.tile_width
            && self.tile_height == other.tile_height
            && self.image == other.image
            && self.tiles == other.tiles
    }
}

impl Eq for TilesetDescriptor {}

impl TilesetDescriptor {
    /// Create a descriptor, rejecting duplicate ids, empty names, zero tile sizes
    /// and text that cannot be written as XML
    pub fn new(
        name: impl Into<String>,
        tile_width: u32,
        tile_height: u32,
        image: TilesetImage,
        tiles: Vec<TileRecord>,
    ) -> Result<Self, DescriptorError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(DescriptorError::ZeroTileSize {
                width: tile_width,
                height: tile_height,
            });
        }

        let name = name.into();
        check_xml_text(|| "tileset name".to_string(), &name)?;
        check_xml_text(|| "image source".to_string(), &image.source)?;

        let mut index = HashMap::with_capacity(tiles.len());
        for (position, tile) in tiles.iter().enumerate() {
            if tile.name.is_empty() {
                return Err(DescriptorError::EmptyTileName(tile.id));
            }
            check_xml_text(|| format!("name of tile {}", tile.id), &tile.name)?;
            if index.insert(tile.id, position).is_some() {
                return Err(DescriptorError::DuplicateTileId(tile.id));
            }
        }

        Ok(Self {
            name,
            tile_width,
            tile_height,
            image,
            tiles,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tile width in pixels
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Tile height in pixels
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn image(&self) -> &TilesetImage {
        &self.image
    }

    /// Tiles in declared order
    pub fn tiles(&self) -> &[TileRecord] {
        &self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Declared ids, in declared order
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.tiles.iter().map(|t| t.id)
    }

    /// Tile names in declared order, duplicates included
    pub fn tile_names(&self) -> Vec<&str> {
        self.tiles.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn get_tile(&self, id: u32) -> Option<&TileRecord> {
        self.index.get(&id).map(|&pos| &self.tiles[pos])
    }

    /// Look up the semantic name of a tile
    pub fn tile_name(&self, id: u32) -> Option<&str> {
        self.get_tile(id).map(|t| t.name())
    }

    pub fn contains(&self, id: u32) -> bool {
        self.index.contains_key(&id)
    }

    /// Reverse lookup. With repeated names the first declared tile wins.
    pub fn tile_id(&self, name: &str) -> Option<u32> {
        self.tiles.iter().find(|t| t.name == name).map(|t| t.id)
    }

    /// Whether every tile name appears exactly once
    pub fn has_unique_names(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.tiles.len());
        self.tiles.iter().all(|t| seen.insert(t.name.as_str()))
    }

    /// Number of tile columns in the image grid
    pub fn columns(&self) -> u32 {
        self.image.width / self.tile_width
    }

    /// Number of tile rows in the image grid
    pub fn rows(&self) -> u32 {
        self.image.height / self.tile_height
    }
}
