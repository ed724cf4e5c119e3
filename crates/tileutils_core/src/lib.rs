//! Core data structures for TileUtils
//!
//! This crate provides the in-memory form of a Tiled tileset descriptor:
//! - `TilesetDescriptor` - Named tileset with uniform tile size and one image
//! - `TileRecord` - A tile id and its semantic name
//! - `TilesetImage` - The sprite sheet the tiles are cut from
//! - `TileNameReport` - Sorted tile names and repeated names
//!
//! Reading and writing `.tsx` files lives in `tileutils_tsx`.

mod report;
mod tileset;

pub use report::{DuplicateName, TileNameReport};
pub use tileset::{DescriptorError, TileRecord, TilesetDescriptor, TilesetImage};
