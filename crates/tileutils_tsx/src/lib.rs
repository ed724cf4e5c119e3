//! Reader and writer for Tiled `.tsx` tileset descriptors
//!
//! A descriptor looks like this:
//!
//! ```xml
//! <tileset name="standard" tilewidth="32" tileheight="32">
//!  <image source="../Images/standard.png" width="96" height="640"/>
//!  <tile id="1">
//!   <properties>
//!    <property name="name" value="diagonalFloorL"/>
//!   </properties>
//!  </tile>
//! </tileset>
//! ```
//!
//! Loading either produces a complete [`TilesetDescriptor`] or fails; there
//! is no partial result.
//!
//! # Example
//!
//! ```rust,ignore
//! use tileutils_tsx::load_tileset;
//!
//! let tileset = load_tileset("Tiles And Objects/Tilesets/standard.tsx")?;
//! assert_eq!(tileset.tile_name(1), Some("diagonalFloorL"));
//! ```

mod reader;
mod writer;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;
use tileutils_core::{DescriptorError, TilesetDescriptor};

use reader::TsxReader;

/// Well-formed markup that does not describe a valid tileset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing <{element}> element")]
    MissingElement { element: &'static str },
    #[error("expected <tileset> as root element, found <{found}>")]
    UnexpectedRoot { found: String },
    #[error("<{element}> is missing the '{attribute}' attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("<{element}> has an invalid '{attribute}' value: {value:?}")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    #[error("tile {id} has no 'name' property")]
    MissingTileName { id: u32 },
    #[error("duplicate tile id {id}")]
    DuplicateTileId { id: u32 },
    #[error("tileset has more than one <image> element")]
    DuplicateImage,
    #[error("{field} contains {character:?}, which XML cannot represent")]
    InvalidCharacter { field: String, character: char },
}

impl From<DescriptorError> for SchemaError {
    fn from(err: DescriptorError) -> Self {
        match err {
            DescriptorError::DuplicateTileId(id) => SchemaError::DuplicateTileId { id },
            DescriptorError::EmptyTileName(id) => SchemaError::MissingTileName { id },
            DescriptorError::ZeroTileSize { width, height } => {
                let (attribute, value) = if width == 0 {
                    ("tilewidth", width)
                } else {
                    ("tileheight", height)
                };
                SchemaError::InvalidAttribute {
                    element: "tileset",
                    attribute,
                    value: value.to_string(),
                }
            }
            DescriptorError::InvalidCharacter { field, character } => {
                SchemaError::InvalidCharacter { field, character }
            }
        }
    }
}

/// Error type for tileset loading and saving failures
#[derive(Debug, Error)]
pub enum TsxError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed XML at {line}:{column}: {message}")]
    Parse {
        message: String,
        line: u64,
        column: u64,
    },
    #[error("invalid tileset: {0}")]
    Schema(#[from] SchemaError),
    #[error("failed to write XML: {0}")]
    Write(#[from] xml::writer::Error),
}

impl TsxError {
    /// The schema violation, if this is one
    pub fn as_schema(&self) -> Option<&SchemaError> {
        match self {
            TsxError::Schema(err) => Some(err),
            _ => None,
        }
    }
}

/// Load a tileset from a `.tsx` file
pub fn load_tileset(path: impl AsRef<Path>) -> Result<TilesetDescriptor, TsxError> {
    let path = path.as_ref();
    debug!("Loading tileset from {}", path.display());

    let file = File::open(path).map_err(|source| TsxError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_tileset_from_reader(BufReader::new(file))
}

/// Load a tileset from any reader
pub fn load_tileset_from_reader<R: Read>(reader: R) -> Result<TilesetDescriptor, TsxError> {
    let tileset = TsxReader::new(reader).read_tileset()?;
    debug!(
        "Loaded tileset '{}' with {} tiles",
        tileset.name(),
        tileset.tile_count()
    );
    Ok(tileset)
}

/// Load a tileset from bytes
pub fn load_tileset_from_bytes(bytes: &[u8]) -> Result<TilesetDescriptor, TsxError> {
    load_tileset_from_reader(bytes)
}

/// Load a tileset from a string
pub fn load_tileset_from_str(xml: &str) -> Result<TilesetDescriptor, TsxError> {
    load_tileset_from_reader(xml.as_bytes())
}

/// Write a tileset as `.tsx` markup
pub fn write_tileset<W: Write>(tileset: &TilesetDescriptor, sink: W) -> Result<(), TsxError> {
    writer::write_events(tileset, sink)
}

/// Render a tileset as a `.tsx` document
pub fn to_tsx_string(tileset: &TilesetDescriptor) -> Result<String, TsxError> {
    let mut buffer = Vec::new();
    write_tileset(tileset, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Save a tileset to a `.tsx` file
pub fn save_tileset(tileset: &TilesetDescriptor, path: impl AsRef<Path>) -> Result<(), TsxError> {
    let path = path.as_ref();
    let io_error = |source| TsxError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut sink = BufWriter::new(file);
    write_tileset(tileset, &mut sink)?;
    sink.flush().map_err(io_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileutils_core::{TileRecord, TilesetImage};

    const STANDARD_TSX: &str = include_str!("../../../assets/Tilesets/standard.tsx");

    fn schema_error(xml: &str) -> SchemaError {
        match load_tileset_from_str(xml) {
            Err(err) => match err.as_schema() {
                Some(schema) => schema.clone(),
                None => panic!("expected a schema error, got {:?}", err),
            },
            Ok(tileset) => panic!("expected a schema error, got {:?}", tileset),
        }
    }

    #[test]
    fn test_load_standard_tileset() {
        let tileset = load_tileset_from_str(STANDARD_TSX).unwrap();

        assert_eq!(tileset.name(), "standard");
        assert_eq!(tileset.tile_width(), 32);
        assert_eq!(tileset.tile_height(), 32);
        assert_eq!(tileset.image().source, "../Images/standard.png");
        assert_eq!(tileset.image().width, 96);
        assert_eq!(tileset.image().height, 640);
        assert_eq!(tileset.tile_count(), 59);
        assert_eq!(tileset.ids().collect::<Vec<_>>(), (1..=59).collect::<Vec<_>>());
        assert_eq!(tileset.tile_name(1), Some("diagonalFloorL"));
        assert_eq!(tileset.tile_name(3), Some("floorU"));
        assert_eq!(tileset.tile_name(59), Some("rampOneThreeBaseL"));
        assert_eq!(tileset.tile_name(0), None);
        assert_eq!(tileset.tile_name(60), None);
    }

    #[test]
    fn test_standard_names_reverse_lookup() {
        let tileset = load_tileset_from_str(STANDARD_TSX).unwrap();

        assert!(tileset.has_unique_names());
        for tile in tileset.tiles() {
            assert_eq!(tileset.tile_name(tile.id()), Some(tile.name()));
            assert_eq!(tileset.tile_id(tile.name()), Some(tile.id()));
        }
    }

    #[test]
    fn test_round_trip_standard() {
        let tileset = load_tileset_from_str(STANDARD_TSX).unwrap();
        let xml = to_tsx_string(&tileset).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        let reloaded = load_tileset_from_str(&xml).unwrap();
        assert_eq!(reloaded, tileset);
    }

    #[test]
    fn test_round_trip_escapes_names() {
        let tileset = TilesetDescriptor::new(
            "odd \"names\" & <more>",
            16,
            8,
            TilesetImage::new("../Images/a&b.png", 48, 16),
            vec![
                TileRecord::new(40, "cover<L>"),
                TileRecord::new(0, "it's"),
            ],
        )
        .unwrap();

        let reloaded = load_tileset_from_str(&to_tsx_string(&tileset).unwrap()).unwrap();
        assert_eq!(reloaded, tileset);
        assert_eq!(reloaded.ids().collect::<Vec<_>>(), vec![40, 0]);
    }

    #[test]
    fn test_round_trip_whitespace_in_names() {
        let tileset = TilesetDescriptor::new(
            "  spaced  ",
            32,
            32,
            TilesetImage::new("t.png", 32, 32),
            vec![
                TileRecord::new(1, "line\nbreak"),
                TileRecord::new(2, "\ttabbed"),
                TileRecord::new(3, "carriage\rreturn"),
                TileRecord::new(4, "  padded  "),
            ],
        )
        .unwrap();

        let reloaded = load_tileset_from_str(&to_tsx_string(&tileset).unwrap()).unwrap();
        assert_eq!(reloaded, tileset);
    }

    #[test]
    fn test_unwritable_names_never_reach_the_writer() {
        let result = TilesetDescriptor::new(
            "t",
            32,
            32,
            TilesetImage::new("t.png", 32, 32),
            vec![TileRecord::new(1, "bell\u{7}")],
        );
        let err = SchemaError::from(result.unwrap_err());
        assert_eq!(
            err,
            SchemaError::InvalidCharacter {
                field: "name of tile 1".to_string(),
                character: '\u{7}'
            }
        );
    }

    #[test]
    fn test_trailing_content_is_parse_error() {
        let document = r#"<tileset name="t" tilewidth="32" tileheight="32">
  <image source="t.png" width="32" height="32"/>
  <tile id="1"><properties><property name="name" value="a"/></properties></tile>
</tileset>"#;
        assert!(load_tileset_from_str(document).is_ok());
        assert!(load_tileset_from_str(&format!("{document}\n<!-- done -->\n")).is_ok());

        let junk = load_tileset_from_str(&format!("{document}<<<garbage"));
        assert!(matches!(junk, Err(TsxError::Parse { .. })));

        let second_root = load_tileset_from_str(&format!("{document}<second/>"));
        assert!(matches!(second_root, Err(TsxError::Parse { .. })));
    }

    #[test]
    fn test_missing_image() {
        let err = schema_error(
            r#"<tileset name="t" tilewidth="32" tileheight="32">
                <tile id="1"><properties><property name="name" value="a"/></properties></tile>
            </tileset>"#,
        );

        assert_eq!(err, SchemaError::MissingElement { element: "image" });
        assert!(err.to_string().contains("image"));
    }

    #[test]
    fn test_duplicate_tile_id() {
        let err = schema_error(
            r#"<tileset name="t" tilewidth="32" tileheight="32">
                <image source="t.png" width="32" height="32"/>
                <tile id="3"><properties><property name="name" value="a"/></properties></tile>
                <tile id="3"><properties><property name="name" value="b"/></properties></tile>
            </tileset>"#,
        );

        assert_eq!(err, SchemaError::DuplicateTileId { id: 3 });
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let result = load_tileset_from_str("<<<>>> not markup");
        assert!(matches!(result, Err(TsxError::Parse { .. })));

        let result = load_tileset_from_bytes(b"");
        assert!(matches!(result, Err(TsxError::Parse { .. })));
    }

    #[test]
    fn test_unclosed_document_reports_location() {
        let xml = "<tileset name=\"t\" tilewidth=\"32\" tileheight=\"32\">\n<image source=\"t.png\" width=\"32\" height=\"32\"/>\n";
        match load_tileset_from_str(xml) {
            Err(TsxError::Parse { line, .. }) => assert!(line >= 2),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_mandatory_attributes() {
        let err = schema_error(
            r#"<tileset name="t" tileheight="32"><image source="t.png" width="1" height="1"/></tileset>"#,
        );
        assert_eq!(
            err,
            SchemaError::MissingAttribute {
                element: "tileset",
                attribute: "tilewidth"
            }
        );

        let err = schema_error(
            r#"<tileset name="t" tilewidth="32" tileheight="32"><image width="1" height="1"/></tileset>"#,
        );
        assert_eq!(
            err,
            SchemaError::MissingAttribute {
                element: "image",
                attribute: "source"
            }
        );

        let err = schema_error(
            r#"<tileset name="t" tilewidth="32" tileheight="32"><image source="t.png" width="1"/></tileset>"#,
        );
        assert!(err.to_string().contains("height"));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = schema_error(
            r#"<tileset name="t" tilewidth="wide" tileheight="32"><image source="t.png" width="1" height="1"/></tileset>"#,
        );
        assert!(matches!(
            err,
            SchemaError::InvalidAttribute { attribute: "tilewidth", ref value, .. } if value == "wide"
        ));

        let err = schema_error(
            r#"<tileset name="t" tilewidth="32" tileheight="32"><image source="t.png" width="1" height="1"/><tile id="-4"/></tileset>"#,
        );
        assert!(matches!(
            err,
            SchemaError::InvalidAttribute { element: "tile", attribute: "id", .. }
        ));

        let err = schema_error(
            r#"<tileset name="t" tilewidth="32" tileheight="0"><image source="t.png" width="1" height="1"/></tileset>"#,
        );
        assert!(matches!(
            err,
            SchemaError::InvalidAttribute { attribute: "tileheight", .. }
        ));
    }

    #[test]
    fn test_tile_without_name_property() {
        let err = schema_error(
            r#"<tileset name="t" tilewidth="32" tileheight="32">
                <image source="t.png" width="32" height="32"/>
                <tile id="9"><properties><property name="solid" value="true"/></properties></tile>
            </tileset>"#,
        );
        assert_eq!(err, SchemaError::MissingTileName { id: 9 });

        let err = schema_error(
            r#"<tileset name="t" tilewidth="32" tileheight="32">
                <image source="t.png" width="32" height="32"/>
                <tile id="2"/>
            </tileset>"#,
        );
        assert_eq!(err, SchemaError::MissingTileName { id: 2 });
    }

    #[test]
    fn test_extra_content_is_ignored() {
        let tileset = load_tileset_from_str(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <tileset name="t" tilewidth="32" tileheight="32" spacing="0">
                <!-- sprite sheet -->
                <image source="t.png" width="64" height="32" trans="ff00ff"/>
                <terraintypes><terrain name="grass" tile="1"/></terraintypes>
                <tile id="1">
                    <properties>
                        <property name="solid" value="false"/>
                        <property name="name" value="floorU"/>
                        <property name="name" value="ignored"/>
                    </properties>
                </tile>
                <tile id="2"><properties><property name="name" value="wallU"/></properties></tile>
            </tileset>"#,
        )
        .unwrap();

        assert_eq!(tileset.tile_count(), 2);
        assert_eq!(tileset.tile_name(1), Some("floorU"));
        assert_eq!(tileset.tile_name(2), Some("wallU"));
        assert_eq!(tileset.columns(), 2);
    }

    #[test]
    fn test_wrong_root_and_second_image() {
        let err = schema_error(r#"<map version="1.0"/>"#);
        assert_eq!(
            err,
            SchemaError::UnexpectedRoot {
                found: "map".to_string()
            }
        );

        let err = schema_error(
            r#"<tileset name="t" tilewidth="32" tileheight="32">
                <image source="a.png" width="32" height="32"/>
                <image source="b.png" width="32" height="32"/>
            </tileset>"#,
        );
        assert_eq!(err, SchemaError::DuplicateImage);
    }

    #[test]
    fn test_save_and_load_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("standard.tsx");

        let tileset = load_tileset_from_str(STANDARD_TSX).unwrap();
        save_tileset(&tileset, &path).unwrap();

        let reloaded = load_tileset(&path).unwrap();
        assert_eq!(reloaded, tileset);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nope.tsx");

        match load_tileset(&path) {
            Err(TsxError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected an io error, got {:?}", other),
        }
    }
}
