//! Event-driven parser for the `.tsx` markup

use std::io::Read;

use log::debug;
use tileutils_core::{TileRecord, TilesetDescriptor, TilesetImage};
use xml::attribute::OwnedAttribute;
use xml::common::Position;
use xml::reader::{EventReader, XmlEvent};

use crate::{SchemaError, TsxError};

/// Pulls events from the XML parser and builds a descriptor from them.
///
/// Every `parse_*` method is entered right after the element's start event
/// and returns once its matching end event has been consumed.
pub(crate) struct TsxReader<R: Read> {
    events: EventReader<R>,
}

impl<R: Read> TsxReader<R> {
    pub(crate) fn new(source: R) -> Self {
        Self {
            events: EventReader::new(source),
        }
    }

    pub(crate) fn read_tileset(mut self) -> Result<TilesetDescriptor, TsxError> {
        loop {
            match self.next()? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    if name.local_name != "tileset" {
                        return Err(SchemaError::UnexpectedRoot {
                            found: name.local_name,
                        }
                        .into());
                    }
                    let tileset = self.parse_tileset(&attributes)?;
                    self.finish_document()?;
                    return Ok(tileset);
                }
                XmlEvent::EndDocument => {
                    return Err(SchemaError::MissingElement { element: "tileset" }.into())
                }
                _ => {}
            }
        }
    }

    fn parse_tileset(
        &mut self,
        attributes: &[OwnedAttribute],
    ) -> Result<TilesetDescriptor, TsxError> {
        let tileset_name = required_attr("tileset", attributes, "name")?.to_string();
        let tile_width = required_u32("tileset", attributes, "tilewidth")?;
        let tile_height = required_u32("tileset", attributes, "tileheight")?;
        if tile_width == 0 {
            return Err(invalid("tileset", "tilewidth", "0").into());
        }
        if tile_height == 0 {
            return Err(invalid("tileset", "tileheight", "0").into());
        }

        let mut image = None;
        let mut tiles = Vec::new();
        loop {
            match self.next()? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => match name.local_name.as_str() {
                    "image" => {
                        if image.is_some() {
                            return Err(SchemaError::DuplicateImage.into());
                        }
                        image = Some(parse_image(&attributes)?);
                        self.skip_element()?;
                    }
                    "tile" => tiles.push(self.parse_tile(&attributes)?),
                    other => {
                        debug!("Skipping <{}> in tileset '{}'", other, tileset_name);
                        self.skip_element()?;
                    }
                },
                XmlEvent::EndElement { .. } => break,
                XmlEvent::EndDocument => return Err(self.premature_end()),
                _ => {}
            }
        }

        let image = image.ok_or(SchemaError::MissingElement { element: "image" })?;
        let tileset = TilesetDescriptor::new(tileset_name, tile_width, tile_height, image, tiles)
            .map_err(SchemaError::from)?;
        Ok(tileset)
    }

    fn parse_tile(&mut self, attributes: &[OwnedAttribute]) -> Result<TileRecord, TsxError> {
        let id = required_u32("tile", attributes, "id")?;

        let mut tile_name = None;
        loop {
            match self.next()? {
                XmlEvent::StartElement { name, .. } => {
                    if name.local_name == "properties" {
                        let found = self.parse_properties()?;
                        if tile_name.is_none() {
                            tile_name = found;
                        }
                    } else {
                        self.skip_element()?;
                    }
                }
                XmlEvent::EndElement { .. } => break,
                XmlEvent::EndDocument => return Err(self.premature_end()),
                _ => {}
            }
        }

        match tile_name {
            Some(name) if !name.is_empty() => Ok(TileRecord::new(id, name)),
            _ => Err(SchemaError::MissingTileName { id }.into()),
        }
    }

    /// Returns the value of the first `name` property, if any
    fn parse_properties(&mut self) -> Result<Option<String>, TsxError> {
        let mut tile_name = None;
        loop {
            match self.next()? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    if name.local_name == "property"
                        && tile_name.is_none()
                        && attr(&attributes, "name") == Some("name")
                    {
                        tile_name = Some(required_attr("property", &attributes, "value")?.to_string());
                    }
                    self.skip_element()?;
                }
                XmlEvent::EndElement { .. } => break,
                XmlEvent::EndDocument => return Err(self.premature_end()),
                _ => {}
            }
        }
        Ok(tile_name)
    }

    /// Drain events after the root so the parser rejects trailing content
    fn finish_document(&mut self) -> Result<(), TsxError> {
        loop {
            match self.next()? {
                XmlEvent::EndDocument => return Ok(()),
                XmlEvent::StartElement { name, .. } => {
                    let position = self.events.position();
                    return Err(TsxError::Parse {
                        message: format!("unexpected <{}> after the root element", name.local_name),
                        line: position.row + 1,
                        column: position.column + 1,
                    });
                }
                _ => {}
            }
        }
    }

    /// Consume everything up to and including the end of the current element
    fn skip_element(&mut self) -> Result<(), TsxError> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.next()? {
                XmlEvent::StartElement { .. } => depth += 1,
                XmlEvent::EndElement { .. } => depth -= 1,
                XmlEvent::EndDocument => return Err(self.premature_end()),
                _ => {}
            }
        }
        Ok(())
    }

    fn next(&mut self) -> Result<XmlEvent, TsxError> {
        self.events.next().map_err(|e| {
            let position = e.position();
            TsxError::Parse {
                message: e.msg().to_string(),
                line: position.row + 1,
                column: position.column + 1,
            }
        })
    }

    fn premature_end(&self) -> TsxError {
        let position = self.events.position();
        TsxError::Parse {
            message: "document ended before the tileset was closed".to_string(),
            line: position.row + 1,
            column: position.column + 1,
        }
    }
}

fn parse_image(attributes: &[OwnedAttribute]) -> Result<TilesetImage, SchemaError> {
    let source = required_attr("image", attributes, "source")?;
    let width = required_u32("image", attributes, "width")?;
    let height = required_u32("image", attributes, "height")?;
    Ok(TilesetImage::new(source, width, height))
}

fn attr<'a>(attributes: &'a [OwnedAttribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.name.local_name == name)
        .map(|a| a.value.as_str())
}

fn required_attr<'a>(
    element: &'static str,
    attributes: &'a [OwnedAttribute],
    name: &'static str,
) -> Result<&'a str, SchemaError> {
    attr(attributes, name).ok_or(SchemaError::MissingAttribute {
        element,
        attribute: name,
    })
}

fn required_u32(
    element: &'static str,
    attributes: &[OwnedAttribute],
    name: &'static str,
) -> Result<u32, SchemaError> {
    let value = required_attr(element, attributes, name)?;
    value
        .trim()
        .parse()
        .map_err(|_| invalid(element, name, value))
}

fn invalid(element: &'static str, attribute: &'static str, value: &str) -> SchemaError {
    SchemaError::InvalidAttribute {
        element,
        attribute,
        value: value.to_string(),
    }
}
