use std::path::Path;

use log::debug;

use crate::cell::Cell;
use crate::color::Color;
use crate::error::Result;
use crate::layer::{read_layers, Layer};
use crate::loader::{FsLoader, Loader, MapReader};
use crate::properties::Properties;
use crate::tileset::Tileset;
use crate::types::Point;
use crate::xml::Element;

attribute_enum! {
    pub enum Orientation("map orientation") {
        #[default]
        Orthogonal => "orthogonal",
        Isometric => "isometric",
        Staggered => "staggered",
        Hexagonal => "hexagonal",
    }
}

attribute_enum! {
    /// Order in which tiles are drawn.
    pub enum RenderOrder("map renderorder") {
        #[default]
        RightDown => "right-down",
        RightUp => "right-up",
        LeftDown => "left-down",
        LeftUp => "left-up",
    }
}

attribute_enum! {
    /// Which axis is staggered on staggered and hexagonal maps.
    pub enum StaggerAxis("map staggeraxis") {
        X => "x",
        #[default]
        Y => "y",
    }
}

attribute_enum! {
    /// Whether even or odd rows/columns are shifted on staggered and
    /// hexagonal maps.
    pub enum StaggerIndex("map staggerindex") {
        Even => "even",
        #[default]
        Odd => "odd",
    }
}

/// A parsed map document.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    /// Format version.
    pub version: String,
    /// Version of the editor that saved the map.
    pub tiled_version: String,
    pub class: String,
    pub orientation: Orientation,
    pub render_order: RenderOrder,
    /// Compression level used for tile layer data; -1 is the codec default.
    pub compression_level: i32,
    /// Size in tiles.
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub hex_side_length: i32,
    pub stagger_axis: StaggerAxis,
    pub stagger_index: StaggerIndex,
    pub parallax_origin: Point,
    /// Zero when the map does not set one.
    pub background_color: Color,
    pub infinite: bool,
    pub next_layer_id: u32,
    pub next_object_id: u32,
    /// Tilesets in document order, which is also ascending `first_gid` order.
    pub tilesets: Vec<Tileset>,
    /// Top-level layers in drawing order.
    pub layers: Vec<Layer>,
    pub properties: Properties,
}

impl Map {
    /// Parse map text. Tileset references resolve against the current
    /// directory.
    pub fn parse_str(text: &str) -> Result<Map> {
        MapReader::new(FsLoader).parse_map(text, Path::new(""))
    }

    /// Load and parse the map at `path` from disk.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Map> {
        Map::parse_file_with(path, FsLoader)
    }

    /// Load the map and its external tilesets through `loader`.
    pub fn parse_file_with<L: Loader>(path: impl AsRef<Path>, loader: L) -> Result<Map> {
        MapReader::new(loader).read_map(path.as_ref())
    }

    pub(crate) fn from_element<L: Loader>(
        root: &Element,
        reader: &mut MapReader<L>,
        base_dir: &Path,
    ) -> Result<Map> {
        let mut tilesets = Vec::new();
        for element in root.children("tileset") {
            let tileset = match element.attribute("source") {
                Some(source) => {
                    let first_gid = element.number_attr("firstgid", 1)?;
                    reader.external_tileset(first_gid, source, base_dir)?
                }
                None => Tileset::from_element(element)?,
            };
            tilesets.push(tileset);
        }

        let map = Map {
            version: root.string_attr("version", "1.0"),
            tiled_version: root.string_attr("tiledversion", ""),
            class: root.string_attr("class", ""),
            orientation: root.enum_attr("orientation")?.unwrap_or_default(),
            render_order: root.enum_attr("renderorder")?.unwrap_or_default(),
            compression_level: root.int_attr("compressionlevel", -1)?,
            width: root.number_attr("width", 0)?,
            height: root.number_attr("height", 0)?,
            tile_width: root.number_attr("tilewidth", 0)?,
            tile_height: root.number_attr("tileheight", 0)?,
            hex_side_length: root.int_attr("hexsidelength", 0)?,
            stagger_axis: root.enum_attr("staggeraxis")?.unwrap_or_default(),
            stagger_index: root.enum_attr("staggerindex")?.unwrap_or_default(),
            parallax_origin: Point {
                x: root.double_attr("parallaxoriginx", 0.0)?,
                y: root.double_attr("parallaxoriginy", 0.0)?,
            },
            background_color: root.color_attr("backgroundcolor")?,
            infinite: root.bool_attr("infinite", false)?,
            next_layer_id: root.number_attr("nextlayerid", 0)?,
            next_object_id: root.number_attr("nextobjectid", 0)?,
            tilesets,
            layers: read_layers(root)?,
            properties: Properties::from_element(root.first_child("properties"))?,
        };

        debug!(
            "parsed {} map {}x{} with {} tilesets and {} layers",
            map.orientation,
            map.width,
            map.height,
            map.tilesets.len(),
            map.layers.len()
        );
        Ok(map)
    }

    /// The tileset a cell or object gid draws from.
    ///
    /// Flag bits are ignored. Empty cells and gids below every tileset's
    /// `first_gid` have none.
    pub fn tileset_for_gid(&self, gid: u32) -> Option<&Tileset> {
        let index = Cell(gid).tile_index();
        if index == 0 {
            return None;
        }
        self.tilesets
            .iter()
            .filter(|tileset| tileset.first_gid <= index)
            .max_by_key(|tileset| tileset.first_gid)
    }

    /// Every layer, depth first, with group layers before their children.
    pub fn all_layers(&self) -> Vec<&Layer> {
        fn walk<'a>(layers: &'a [Layer], out: &mut Vec<&'a Layer>) {
            for layer in layers {
                out.push(layer);
                if let Ok(group) = layer.group() {
                    walk(&group.layers, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.layers, &mut out);
        out
    }
}
