use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::image::Image;
use crate::layer::ObjectGroup;
use crate::loader::{FsLoader, Loader, MapReader};
use crate::object::class_attr;
use crate::properties::Properties;
use crate::types::IntPoint;
use crate::xml::Element;

attribute_enum! {
    /// Anchor point of tile objects drawn from this tileset.
    pub enum ObjectAlignment("tileset objectalignment") {
        #[default]
        Unspecified => "unspecified",
        TopLeft => "topleft",
        Top => "top",
        TopRight => "topright",
        Left => "left",
        Center => "center",
        Right => "right",
        BottomLeft => "bottomleft",
        Bottom => "bottom",
        BottomRight => "bottomright",
    }
}

attribute_enum! {
    pub enum TileRenderSize("tileset tilerendersize") {
        #[default]
        Tile => "tile",
        Grid => "grid",
    }
}

attribute_enum! {
    /// How a tile is scaled when its render size differs from its image.
    pub enum FillMode("tileset fillmode") {
        #[default]
        Stretch => "stretch",
        PreserveAspectFit => "preserve-aspect-fit",
    }
}

attribute_enum! {
    pub enum GridOrientation("grid orientation") {
        #[default]
        Orthogonal => "orthogonal",
        Isometric => "isometric",
    }
}

/// Grid used for tile overlays in the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Grid {
    pub orientation: GridOrientation,
    pub width: i32,
    pub height: i32,
}

/// One step of a tile animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frame {
    /// Local id of the tile shown, within the same tileset.
    pub tile_id: u32,
    /// Milliseconds.
    pub duration: u32,
}

/// Per-tile data. Only tiles with something to say are listed.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub id: u32,
    pub class: String,
    /// Sub-rectangle origin inside the tile's image.
    pub position: IntPoint,
    pub width: i32,
    pub height: i32,
    pub probability: f64,
    pub image: Option<Image>,
    pub object_group: Option<ObjectGroup>,
    pub animation: Vec<Frame>,
    pub properties: Properties,
}

impl Tile {
    fn from_element(element: &Element) -> Result<Tile> {
        let animation: Vec<Frame> = match element.first_child("animation") {
            Some(animation) => animation
                .children("frame")
                .map(|frame| -> Result<Frame> {
                    Ok(Frame {
                        tile_id: frame.number_attr("tileid", 0)?,
                        duration: frame.number_attr("duration", 0)?,
                    })
                })
                .collect::<Result<_>>()?,
            None => Vec::new(),
        };

        Ok(Tile {
            id: element.number_attr("id", 0)?,
            class: class_attr(element),
            position: IntPoint {
                x: element.int_attr("x", 0)?,
                y: element.int_attr("y", 0)?,
            },
            width: element.int_attr("width", 0)?,
            height: element.int_attr("height", 0)?,
            probability: element.double_attr("probability", 1.0)?,
            image: element.first_child("image").map(Image::from_element).transpose()?,
            object_group: element
                .first_child("objectgroup")
                .map(ObjectGroup::from_element)
                .transpose()?,
            animation,
            properties: Properties::from_element(element.first_child("properties"))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    /// Global id of the first tile; 1 unless a map says otherwise.
    pub first_gid: u32,
    /// Path of the external document this tileset was loaded from, as the
    /// map wrote it. Empty for embedded tilesets.
    pub source: String,
    pub name: String,
    pub class: String,
    pub tile_width: i32,
    pub tile_height: i32,
    pub spacing: i32,
    pub margin: i32,
    pub tile_count: u32,
    pub columns: u32,
    pub object_alignment: ObjectAlignment,
    pub tile_render_size: TileRenderSize,
    pub fill_mode: FillMode,
    pub tile_offset: IntPoint,
    pub grid: Grid,
    pub image: Option<Image>,
    pub tiles: Vec<Tile>,
    pub properties: Properties,
}

impl Tileset {
    /// Parse a standalone tileset document.
    pub fn parse_str(text: &str) -> Result<Tileset> {
        let root = Element::parse_document(text)?;
        if root.name != "tileset" {
            return Err(Error::missing("tileset root element"));
        }
        Tileset::from_element(&root)
    }

    /// Load and parse a standalone tileset document from disk.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Tileset> {
        Tileset::parse_file_with(path, FsLoader)
    }

    pub fn parse_file_with<L: Loader>(path: impl AsRef<Path>, loader: L) -> Result<Tileset> {
        MapReader::new(loader).read_tileset(path.as_ref())
    }

    /// Read an inline `<tileset>` element.
    pub(crate) fn from_element(element: &Element) -> Result<Tileset> {
        let grid = match element.first_child("grid") {
            Some(grid) => Grid {
                orientation: grid.enum_attr("orientation")?.unwrap_or_default(),
                width: grid.int_attr("width", 0)?,
                height: grid.int_attr("height", 0)?,
            },
            None => Grid::default(),
        };
        let tile_offset = match element.first_child("tileoffset") {
            Some(offset) => IntPoint {
                x: offset.int_attr("x", 0)?,
                y: offset.int_attr("y", 0)?,
            },
            None => IntPoint::default(),
        };

        let tileset = Tileset {
            first_gid: element.number_attr("firstgid", 1)?,
            source: String::new(),
            name: element.string_attr("name", ""),
            class: element.string_attr("class", ""),
            tile_width: element.int_attr("tilewidth", 0)?,
            tile_height: element.int_attr("tileheight", 0)?,
            spacing: element.int_attr("spacing", 0)?,
            margin: element.int_attr("margin", 0)?,
            tile_count: element.number_attr("tilecount", 0)?,
            columns: element.number_attr("columns", 0)?,
            object_alignment: element.enum_attr("objectalignment")?.unwrap_or_default(),
            tile_render_size: element.enum_attr("tilerendersize")?.unwrap_or_default(),
            fill_mode: element.enum_attr("fillmode")?.unwrap_or_default(),
            tile_offset,
            grid,
            image: element.first_child("image").map(Image::from_element).transpose()?,
            tiles: element
                .children("tile")
                .map(Tile::from_element)
                .collect::<Result<_>>()?,
            properties: Properties::from_element(element.first_child("properties"))?,
        };
        debug!(
            "parsed tileset '{}' ({} tiles, {} with data)",
            tileset.name,
            tileset.tile_count,
            tileset.tiles.len()
        );
        Ok(tileset)
    }

    /// Per-tile data for a local tile id.
    pub fn tile(&self, id: u32) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.id == id)
    }

    /// Whether a global tile index falls inside this tileset.
    pub fn contains_gid(&self, gid: u32) -> bool {
        gid >= self.first_gid && gid - self.first_gid < self.tile_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset version="1.10" tiledversion="1.10.2" name="terrain" class="Ground" tilewidth="16" tileheight="16" spacing="1" margin="2" tilecount="48" columns="8" objectalignment="bottom" tilerendersize="grid" fillmode="preserve-aspect-fit">
 <tileoffset x="0" y="-4"/>
 <grid orientation="isometric" width="32" height="16"/>
 <properties>
  <property name="biome" value="forest"/>
 </properties>
 <image source="terrain.png" width="136" height="104"/>
 <tile id="3" type="Water" probability="0.5">
  <animation>
   <frame tileid="3" duration="100"/>
   <frame tileid="4" duration="150"/>
  </animation>
 </tile>
 <tile id="7">
  <objectgroup draworder="index">
   <object id="1" x="0" y="8" width="16" height="8"/>
  </objectgroup>
 </tile>
</tileset>
"#;

    #[test]
    fn parses_all_attributes() {
        let ts = Tileset::parse_str(TSX).unwrap();
        assert_eq!(ts.first_gid, 1);
        assert_eq!(ts.source, "");
        assert_eq!(ts.name, "terrain");
        assert_eq!(ts.class, "Ground");
        assert_eq!((ts.tile_width, ts.tile_height), (16, 16));
        assert_eq!((ts.spacing, ts.margin), (1, 2));
        assert_eq!((ts.tile_count, ts.columns), (48, 8));
        assert_eq!(ts.object_alignment, ObjectAlignment::Bottom);
        assert_eq!(ts.tile_render_size, TileRenderSize::Grid);
        assert_eq!(ts.fill_mode, FillMode::PreserveAspectFit);
        assert_eq!(ts.tile_offset, IntPoint { x: 0, y: -4 });
        assert_eq!(
            ts.grid,
            Grid {
                orientation: GridOrientation::Isometric,
                width: 32,
                height: 16
            }
        );
        assert_eq!(ts.image.as_ref().unwrap().source, "terrain.png");
        assert_eq!(ts.properties.get("biome").as_str().unwrap(), "forest");
    }

    #[test]
    fn tiles_with_animation_and_collision() {
        let ts = Tileset::parse_str(TSX).unwrap();
        assert_eq!(ts.tiles.len(), 2);

        let water = ts.tile(3).unwrap();
        assert_eq!(water.class, "Water");
        assert_eq!(water.probability, 0.5);
        assert_eq!(
            water.animation,
            vec![
                Frame { tile_id: 3, duration: 100 },
                Frame { tile_id: 4, duration: 150 },
            ]
        );

        let wall = ts.tile(7).unwrap();
        assert_eq!(wall.probability, 1.0);
        let collision = wall.object_group.as_ref().unwrap();
        assert_eq!(collision.objects[0].size.y, 8.0);
        assert!(ts.tile(0).is_none());
    }

    #[test]
    fn defaults_for_bare_tileset() {
        let ts = Tileset::parse_str(r#"<tileset name="bare"/>"#).unwrap();
        assert_eq!(ts.object_alignment, ObjectAlignment::Unspecified);
        assert_eq!(ts.tile_render_size, TileRenderSize::Tile);
        assert_eq!(ts.fill_mode, FillMode::Stretch);
        assert_eq!(ts.grid.orientation, GridOrientation::Orthogonal);
        assert!(ts.image.is_none());
        assert!(ts.tiles.is_empty());
    }

    #[test]
    fn contains_gid_range() {
        let mut ts = Tileset::parse_str(TSX).unwrap();
        ts.first_gid = 10;
        assert!(!ts.contains_gid(9));
        assert!(ts.contains_gid(10));
        assert!(ts.contains_gid(57));
        assert!(!ts.contains_gid(58));
    }

    #[test]
    fn errors() {
        assert!(matches!(
            Tileset::parse_str(r#"<map/>"#),
            Err(Error::Missing(_))
        ));
        assert!(matches!(
            Tileset::parse_str(r#"<tileset fillmode="tile"/>"#),
            Err(Error::Format { .. })
        ));
        assert!(matches!(
            Tileset::parse_str(r#"<tileset><grid orientation="hex"/></tileset>"#),
            Err(Error::Format { .. })
        ));
        assert!(matches!(
            Tileset::parse_str(r#"<tileset><image width="4" height="4"/></tileset>"#),
            Err(Error::Unsupported(_))
        ));
    }
}
