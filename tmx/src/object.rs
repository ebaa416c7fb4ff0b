use log::warn;
use smallvec::SmallVec;

use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::properties::Properties;
use crate::text::Text;
use crate::types::Point;
use crate::xml::Element;

/// Vertices of a polygon or polyline, relative to the object position.
pub type Points = SmallVec<[Point; 8]>;

/// An ellipse inscribed in the object's bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ellipse {
    pub center: Point,
    pub size: Point,
}

/// What an object draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Plain rectangle, or a tile when the object carries a gid.
    Rectangle,
    Ellipse(Ellipse),
    Point(Point),
    Polygon(Points),
    Polyline(Points),
    Text(Text),
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Rectangle => "rectangle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Point(_) => "point",
            Shape::Polygon(_) => "polygon",
            Shape::Polyline(_) => "polyline",
            Shape::Text(_) => "text",
        }
    }
}

/// A free-form object in an object group or a tile's collision group.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub id: u32,
    pub name: String,
    pub class: String,
    pub position: Point,
    pub size: Point,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
    /// Tile drawn by this object, with the same flag bits as a layer cell.
    pub gid: Cell,
    pub visible: bool,
    pub shape: Shape,
    pub properties: Properties,
}

impl Object {
    pub(crate) fn from_element(element: &Element) -> Result<Object> {
        if let Some(template) = element.attribute("template") {
            warn!("ignoring object template '{template}'");
        }

        Ok(Object {
            id: element.number_attr("id", 0)?,
            name: element.string_attr("name", ""),
            class: class_attr(element),
            position: Point {
                x: element.double_attr("x", 0.0)?,
                y: element.double_attr("y", 0.0)?,
            },
            size: Point {
                x: element.double_attr("width", 0.0)?,
                y: element.double_attr("height", 0.0)?,
            },
            rotation: element.double_attr("rotation", 0.0)?,
            gid: Cell(element.number_attr("gid", 0)?),
            visible: element.bool_attr("visible", true)?,
            shape: shape_from_element(element)?,
            properties: Properties::from_element(element.first_child("properties"))?,
        })
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch {
            expected,
            found: self.shape.name(),
        }
    }

    pub fn ellipse(&self) -> Result<Ellipse> {
        match &self.shape {
            Shape::Ellipse(ellipse) => Ok(*ellipse),
            _ => Err(self.mismatch("ellipse")),
        }
    }

    pub fn point(&self) -> Result<Point> {
        match &self.shape {
            Shape::Point(point) => Ok(*point),
            _ => Err(self.mismatch("point")),
        }
    }

    pub fn polygon(&self) -> Result<&[Point]> {
        match &self.shape {
            Shape::Polygon(points) => Ok(points),
            _ => Err(self.mismatch("polygon")),
        }
    }

    pub fn polyline(&self) -> Result<&[Point]> {
        match &self.shape {
            Shape::Polyline(points) => Ok(points),
            _ => Err(self.mismatch("polyline")),
        }
    }

    pub fn text(&self) -> Result<&Text> {
        match &self.shape {
            Shape::Text(text) => Ok(text),
            _ => Err(self.mismatch("text")),
        }
    }
}

/// Newer documents write `class`, older ones `type`.
pub(crate) fn class_attr(element: &Element) -> String {
    element
        .attribute("class")
        .or_else(|| element.attribute("type"))
        .unwrap_or("")
        .to_owned()
}

fn shape_from_element(element: &Element) -> Result<Shape> {
    // only the first shape child counts
    for child in element.elements() {
        let shape = match child.name.as_str() {
            "ellipse" => Shape::Ellipse(Ellipse {
                center: Point {
                    x: child.double_attr("x", 0.0)?,
                    y: child.double_attr("y", 0.0)?,
                },
                size: Point {
                    x: child.double_attr("width", 0.0)?,
                    y: child.double_attr("height", 0.0)?,
                },
            }),
            "point" => Shape::Point(Point {
                x: child.double_attr("x", 0.0)?,
                y: child.double_attr("y", 0.0)?,
            }),
            "polygon" => Shape::Polygon(parse_points(child.attribute("points").unwrap_or(""))?),
            "polyline" => Shape::Polyline(parse_points(child.attribute("points").unwrap_or(""))?),
            "text" => Shape::Text(Text::from_element(child)?),
            _ => continue,
        };
        return Ok(shape);
    }
    Ok(Shape::Rectangle)
}

/// Parse a whitespace separated list of `x,y` pairs.
pub fn parse_points(text: &str) -> Result<Points> {
    text.split_whitespace()
        .map(|pair| -> Result<Point> {
            let invalid = || Error::format("point", pair);
            let (x, y) = pair.split_once(',').ok_or_else(invalid)?;
            Ok(Point {
                x: x.parse().map_err(|_| invalid())?,
                y: y.parse().map_err(|_| invalid())?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::HAlign;

    fn object(xml: &str) -> Result<Object> {
        Object::from_element(&Element::parse_document(xml)?)
    }

    #[test]
    fn rectangle_with_properties() {
        let obj = object(
            r#"<object id="4" name="door" type="Door" x="16" y="32.5" width="8" height="24" rotation="90">
  <properties><property name="locked" type="bool" value="true"/></properties>
</object>"#,
        )
        .unwrap();
        assert_eq!(obj.id, 4);
        assert_eq!(obj.name, "door");
        assert_eq!(obj.class, "Door");
        assert_eq!(obj.position, Point { x: 16.0, y: 32.5 });
        assert_eq!(obj.size, Point { x: 8.0, y: 24.0 });
        assert_eq!(obj.rotation, 90.0);
        assert!(obj.visible);
        assert_eq!(obj.shape, Shape::Rectangle);
        assert!(obj.properties.get("locked").as_bool().unwrap());
    }

    #[test]
    fn tile_object_gid_flags() {
        let obj = object(r#"<object id="1" gid="2147483653" x="0" y="0"/>"#).unwrap();
        assert_eq!(obj.gid.tile_index(), 5);
        assert!(obj.gid.flip_horizontal());
    }

    #[test]
    fn each_shape() {
        let ellipse = object(r#"<object id="1" width="10" height="6"><ellipse/></object>"#).unwrap();
        assert_eq!(ellipse.ellipse().unwrap().size, Point::default());

        let point = object(r#"<object id="2" x="3" y="4"><point/></object>"#).unwrap();
        assert_eq!(point.point().unwrap(), Point::default());

        let polygon =
            object(r#"<object id="3"><polygon points="0,0 16,0 16,-8.5"/></object>"#).unwrap();
        assert_eq!(
            polygon.polygon().unwrap(),
            &[
                Point { x: 0.0, y: 0.0 },
                Point { x: 16.0, y: 0.0 },
                Point { x: 16.0, y: -8.5 },
            ]
        );

        let polyline = object(r#"<object id="4"><polyline points="1,2 3,4"/></object>"#).unwrap();
        assert_eq!(polyline.polyline().unwrap().len(), 2);

        let text = object(r#"<object id="5"><text halign="center">Hi</text></object>"#).unwrap();
        assert_eq!(text.text().unwrap().text, "Hi");
        assert_eq!(text.text().unwrap().halign, HAlign::Center);
    }

    #[test]
    fn wrong_shape_accessor() {
        let point = object(r#"<object id="1"><point/></object>"#).unwrap();
        match point.polygon() {
            Err(Error::TypeMismatch { expected, found }) => {
                assert_eq!(expected, "polygon");
                assert_eq!(found, "point");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(point.text().is_err());
    }

    #[test]
    fn points_parse_strictly() {
        assert!(parse_points("").unwrap().is_empty());
        assert_eq!(parse_points("  1,2\n 3,4 ").unwrap().len(), 2);
        assert!(matches!(parse_points("1,2 3"), Err(Error::Format { .. })));
        assert!(matches!(parse_points("1;2"), Err(Error::Format { .. })));
        assert!(matches!(parse_points("a,b"), Err(Error::Format { .. })));
    }
}
