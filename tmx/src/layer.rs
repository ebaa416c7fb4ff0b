//! Layer readers.
//!
//! Every layer kind shares the attributes in [`Layer`]; what differs lives in
//! [`LayerKind`]. Tile layers hand their `<data>` payload to the cell codec.

use log::trace;

use crate::codec::{self, Compression, Encoding};
use crate::color::Color;
use crate::error::{Error, Result};
use crate::grid::CellGrid;
use crate::image::Image;
use crate::object::Object;
use crate::properties::Properties;
use crate::types::Point;
use crate::xml::Element;

attribute_enum! {
    /// Order in which objects of a group are drawn.
    pub enum DrawOrder("object group draworder") {
        #[default]
        TopDown => "topdown",
        Index => "index",
    }
}

/// A tile grid decoded from a `<data>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub encoding: Encoding,
    pub compression: Compression,
    pub cells: CellGrid,
}

impl TileLayer {
    fn from_element(element: &Element, name: &str) -> Result<TileLayer> {
        let width: i64 = element.number_attr("width", 0)?;
        let height: i64 = element.number_attr("height", 0)?;
        if width <= 0 || height <= 0 || width > u32::MAX as i64 || height > u32::MAX as i64 {
            return Err(Error::data_shape(
                name,
                format!("invalid layer size {width}x{height}"),
            ));
        }

        let data = element
            .first_child("data")
            .ok_or_else(|| Error::missing(format!("data element of layer '{name}'")))?;
        let Some(encoding) = data.attribute("encoding") else {
            return Err(Error::LegacyLayerData {
                layer: name.to_owned(),
            });
        };
        if data.first_child("chunk").is_some() {
            return Err(Error::Unsupported(format!(
                "infinite map chunks in layer '{name}'"
            )));
        }
        let compression = data.attribute("compression").unwrap_or("");

        let cells = codec::decode(
            name,
            width as u32,
            height as u32,
            encoding,
            compression,
            data.text(),
        )?;
        Ok(TileLayer {
            encoding: Encoding::parse(name, encoding)?,
            compression: Compression::parse(name, compression)?,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.cells.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.cells.height()
    }

    pub fn tile_index(&self, x: i32, y: i32) -> Result<u32> {
        self.cells.tile_index(x, y)
    }

    pub fn flip_horizontal(&self, x: i32, y: i32) -> Result<bool> {
        self.cells.flip_horizontal(x, y)
    }

    pub fn flip_vertical(&self, x: i32, y: i32) -> Result<bool> {
        self.cells.flip_vertical(x, y)
    }

    pub fn flip_diagonal(&self, x: i32, y: i32) -> Result<bool> {
        self.cells.flip_diagonal(x, y)
    }

    pub fn rotate_hex_120(&self, x: i32, y: i32) -> Result<bool> {
        self.cells.rotate_hex_120(x, y)
    }
}

/// A set of objects. Also used for per-tile collision shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectGroup {
    pub color: Color,
    pub draw_order: DrawOrder,
    pub objects: Vec<Object>,
}

impl ObjectGroup {
    pub(crate) fn from_element(element: &Element) -> Result<ObjectGroup> {
        Ok(ObjectGroup {
            color: element.color_attr("color")?,
            draw_order: element.enum_attr("draworder")?.unwrap_or_default(),
            objects: element
                .children("object")
                .map(Object::from_element)
                .collect::<Result<_>>()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageLayer {
    pub image: Option<Image>,
    pub repeat_x: bool,
    pub repeat_y: bool,
}

/// Child layers of a group, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupLayer {
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Tile(TileLayer),
    Objects(ObjectGroup),
    Image(ImageLayer),
    Group(GroupLayer),
}

impl LayerKind {
    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Tile(_) => "tile layer",
            LayerKind::Objects(_) => "object group",
            LayerKind::Image(_) => "image layer",
            LayerKind::Group(_) => "group layer",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: u32,
    pub name: String,
    pub class: String,
    pub opacity: f64,
    pub visible: bool,
    pub tint_color: Color,
    pub offset: Point,
    pub parallax: Point,
    pub properties: Properties,
    pub kind: LayerKind,
}

impl Layer {
    /// Read a layer element, or `None` if `element` is not a layer.
    pub(crate) fn from_element(element: &Element) -> Result<Option<Layer>> {
        let name = element.string_attr("name", "");
        let kind = match element.name.as_str() {
            "layer" => LayerKind::Tile(TileLayer::from_element(element, &name)?),
            "objectgroup" => LayerKind::Objects(ObjectGroup::from_element(element)?),
            "imagelayer" => LayerKind::Image(ImageLayer {
                image: element.first_child("image").map(Image::from_element).transpose()?,
                repeat_x: element.bool_attr("repeatx", false)?,
                repeat_y: element.bool_attr("repeaty", false)?,
            }),
            "group" => LayerKind::Group(GroupLayer {
                layers: read_layers(element)?,
            }),
            _ => return Ok(None),
        };
        trace!("read {} '{}'", kind.name(), name);

        Ok(Some(Layer {
            id: element.number_attr("id", 0)?,
            class: element.string_attr("class", ""),
            opacity: element.double_attr("opacity", 1.0)?,
            visible: element.bool_attr("visible", true)?,
            tint_color: element.color_attr("tintcolor")?,
            offset: Point {
                x: element.double_attr("offsetx", 0.0)?,
                y: element.double_attr("offsety", 0.0)?,
            },
            parallax: Point {
                x: element.double_attr("parallaxx", 1.0)?,
                y: element.double_attr("parallaxy", 1.0)?,
            },
            properties: Properties::from_element(element.first_child("properties"))?,
            name,
            kind,
        }))
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch {
            expected,
            found: self.kind.name(),
        }
    }

    pub fn tile_layer(&self) -> Result<&TileLayer> {
        match &self.kind {
            LayerKind::Tile(layer) => Ok(layer),
            _ => Err(self.mismatch("tile layer")),
        }
    }

    pub fn object_group(&self) -> Result<&ObjectGroup> {
        match &self.kind {
            LayerKind::Objects(group) => Ok(group),
            _ => Err(self.mismatch("object group")),
        }
    }

    pub fn image_layer(&self) -> Result<&ImageLayer> {
        match &self.kind {
            LayerKind::Image(layer) => Ok(layer),
            _ => Err(self.mismatch("image layer")),
        }
    }

    pub fn group(&self) -> Result<&GroupLayer> {
        match &self.kind {
            LayerKind::Group(group) => Ok(group),
            _ => Err(self.mismatch("group layer")),
        }
    }
}

/// Read every layer child of `parent` in document order.
pub(crate) fn read_layers(parent: &Element) -> Result<Vec<Layer>> {
    let mut layers = Vec::new();
    for element in parent.elements() {
        if let Some(layer) = Layer::from_element(element)? {
            layers.push(layer);
        }
    }
    Ok(layers)
}
