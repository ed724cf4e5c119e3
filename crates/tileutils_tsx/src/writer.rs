//! Serializes a descriptor back to `.tsx` markup

use std::io::Write;

use tileutils_core::TilesetDescriptor;
use xml::common::XmlVersion;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

use crate::TsxError;

pub(crate) fn write_events<W: Write>(
    tileset: &TilesetDescriptor,
    sink: W,
) -> Result<(), TsxError> {
    let mut writer = EmitterConfig::new()
        .perform_indent(true)
        .indent_string(" ")
        .create_writer(sink);

    writer.write(XmlEvent::StartDocument {
        version: XmlVersion::Version10,
        encoding: Some("UTF-8"),
        standalone: None,
    })?;

    let tile_width = tileset.tile_width().to_string();
    let tile_height = tileset.tile_height().to_string();
    writer.write(
        XmlEvent::start_element("tileset")
            .attr("name", tileset.name())
            .attr("tilewidth", &tile_width)
            .attr("tileheight", &tile_height),
    )?;

    let image = tileset.image();
    let image_width = image.width.to_string();
    let image_height = image.height.to_string();
    writer.write(
        XmlEvent::start_element("image")
            .attr("source", &image.source)
            .attr("width", &image_width)
            .attr("height", &image_height),
    )?;
    writer.write(XmlEvent::end_element())?;

    for tile in tileset.tiles() {
        write_tile(&mut writer, tile.id(), tile.name())?;
    }

    writer.write(XmlEvent::end_element())?;
    Ok(())
}

fn write_tile<W: Write>(writer: &mut EventWriter<W>, id: u32, name: &str) -> Result<(), TsxError> {
    let id = id.to_string();
    writer.write(XmlEvent::start_element("tile").attr("id", &id))?;
    writer.write(XmlEvent::start_element("properties"))?;
    writer.write(
        XmlEvent::start_element("property")
            .attr("name", "name")
            .attr("value", name),
    )?;
    writer.write(XmlEvent::end_element())?;
    writer.write(XmlEvent::end_element())?;
    writer.write(XmlEvent::end_element())?;
    Ok(())
}
