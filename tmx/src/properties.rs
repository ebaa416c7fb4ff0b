use std::collections::btree_map::{self, BTreeMap};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::xml::Element;

/// A typed custom property value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PropertyValue {
    /// Returned for names that are not present.
    #[default]
    Empty,
    String(String),
    Int(i32),
    Float(f32),
    Bool(bool),
    Color(Color),
    File(String),
    /// Id of the referenced object, 0 when unset.
    Object(u32),
    /// A named bag of nested properties.
    Class {
        property_type: String,
        properties: Properties,
    },
}

static EMPTY: PropertyValue = PropertyValue::Empty;

impl PropertyValue {
    /// The `type` attribute value this variant is read from.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Empty => "nothing",
            PropertyValue::String(_) => "string",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Color(_) => "color",
            PropertyValue::File(_) => "file",
            PropertyValue::Object(_) => "object",
            PropertyValue::Class { .. } => "class",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PropertyValue::Empty)
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            PropertyValue::String(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    pub fn as_int(&self) -> Result<i32> {
        match self {
            PropertyValue::Int(v) => Ok(*v),
            other => Err(other.mismatch("int")),
        }
    }

    pub fn as_float(&self) -> Result<f32> {
        match self {
            PropertyValue::Float(v) => Ok(*v),
            other => Err(other.mismatch("float")),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            PropertyValue::Bool(v) => Ok(*v),
            other => Err(other.mismatch("bool")),
        }
    }

    pub fn as_color(&self) -> Result<Color> {
        match self {
            PropertyValue::Color(c) => Ok(*c),
            other => Err(other.mismatch("color")),
        }
    }

    pub fn as_file(&self) -> Result<&str> {
        match self {
            PropertyValue::File(path) => Ok(path),
            other => Err(other.mismatch("file")),
        }
    }

    pub fn as_object(&self) -> Result<u32> {
        match self {
            PropertyValue::Object(id) => Ok(*id),
            other => Err(other.mismatch("object")),
        }
    }

    pub fn as_class(&self) -> Result<&Properties> {
        match self {
            PropertyValue::Class { properties, .. } => Ok(properties),
            other => Err(other.mismatch("class")),
        }
    }

    fn from_element(property: &Element, name: &str) -> Result<PropertyValue> {
        let ty = property.attribute("type").unwrap_or("string");
        let value = property.attribute("value");
        let required = || value.ok_or_else(|| Error::missing(format!("value of property '{name}'")));
        let invalid = |value: &str| Error::format(format!("{ty} property '{name}'"), value);

        Ok(match ty {
            // multi-line strings are stored as element text instead
            "string" => match value {
                Some(value) => PropertyValue::String(value.to_owned()),
                None if !property.text().is_empty() => {
                    PropertyValue::String(property.text().to_owned())
                }
                None => return Err(Error::missing(format!("value of property '{name}'"))),
            },
            "int" => {
                let value = required()?;
                PropertyValue::Int(value.trim().parse().map_err(|_| invalid(value))?)
            }
            "float" => {
                let value = required()?;
                PropertyValue::Float(value.trim().parse().map_err(|_| invalid(value))?)
            }
            "bool" => match required()? {
                "true" => PropertyValue::Bool(true),
                "false" => PropertyValue::Bool(false),
                other => return Err(invalid(other)),
            },
            "color" => match required()? {
                "" => PropertyValue::Color(Color::default()),
                text => PropertyValue::Color(Color::parse(text)?),
            },
            "file" => PropertyValue::File(required()?.to_owned()),
            "object" => {
                let value = required()?;
                PropertyValue::Object(value.trim().parse().map_err(|_| invalid(value))?)
            }
            "class" => PropertyValue::Class {
                property_type: property.string_attr("propertytype", ""),
                properties: Properties::from_element(property.first_child("properties"))?,
            },
            other => return Err(Error::format("property type", other)),
        })
    }
}

/// Custom properties attached to a map, tileset, tile, layer or object.
///
/// Names are unique; a later `<property>` with the same name replaces an
/// earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: BTreeMap<String, PropertyValue>,
}

impl Properties {
    /// Read the `<property>` children of a `<properties>` element, if any.
    pub(crate) fn from_element(element: Option<&Element>) -> Result<Properties> {
        let mut values = BTreeMap::new();
        let Some(element) = element else {
            return Ok(Properties { values });
        };

        for property in element.children("property") {
            let name = property
                .attribute("name")
                .ok_or_else(|| Error::missing("property name"))?;
            let value = PropertyValue::from_element(property, name)?;
            values.insert(name.to_owned(), value);
        }
        Ok(Properties { values })
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Look up a property, yielding [`PropertyValue::Empty`] when absent.
    pub fn get(&self, name: &str) -> &PropertyValue {
        self.values.get(name).unwrap_or(&EMPTY)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PropertyValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = btree_map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<Properties> {
        let root = Element::parse_document(xml)?;
        Properties::from_element(Some(&root))
    }

    #[test]
    fn typed_values() {
        let props = parse(
            r##"<properties>
  <property name="title" value="Cave"/>
  <property name="lives" type="int" value="3"/>
  <property name="speed" type="float" value="1.5"/>
  <property name="boss" type="bool" value="true"/>
  <property name="tint" type="color" value="#ff102030"/>
  <property name="none" type="color" value=""/>
  <property name="music" type="file" value="cave.ogg"/>
  <property name="door" type="object" value="12"/>
</properties>"##,
        )
        .unwrap();

        assert_eq!(props.len(), 8);
        assert_eq!(props.get("title").as_str().unwrap(), "Cave");
        assert_eq!(props.get("lives").as_int().unwrap(), 3);
        assert_eq!(props.get("speed").as_float().unwrap(), 1.5);
        assert!(props.get("boss").as_bool().unwrap());
        assert_eq!(
            props.get("tint").as_color().unwrap(),
            Color::rgba(0x10, 0x20, 0x30, 0xff)
        );
        assert_eq!(props.get("none").as_color().unwrap(), Color::default());
        assert_eq!(props.get("music").as_file().unwrap(), "cave.ogg");
        assert_eq!(props.get("door").as_object().unwrap(), 12);
    }

    #[test]
    fn absent_name_is_empty_sentinel() {
        let props = parse("<properties/>").unwrap();
        assert!(!props.has("missing"));
        assert!(props.get("missing").is_empty());
        assert!(props.is_empty());
    }

    #[test]
    fn last_duplicate_wins() {
        let props = parse(
            r#"<properties>
  <property name="a" type="int" value="1"/>
  <property name="a" type="int" value="2"/>
</properties>"#,
        )
        .unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("a").as_int().unwrap(), 2);
    }

    #[test]
    fn nested_class() {
        let props = parse(
            r#"<properties>
  <property name="spawn" type="class" propertytype="Spawner">
    <properties>
      <property name="rate" type="float" value="0.25"/>
      <property name="inner" type="class">
        <properties><property name="depth" type="int" value="2"/></properties>
      </property>
    </properties>
  </property>
</properties>"#,
        )
        .unwrap();

        let spawn = props.get("spawn");
        match spawn {
            PropertyValue::Class { property_type, .. } => assert_eq!(property_type, "Spawner"),
            other => panic!("unexpected {other:?}"),
        }
        let inner = spawn.as_class().unwrap();
        assert_eq!(inner.get("rate").as_float().unwrap(), 0.25);
        let deeper = inner.get("inner").as_class().unwrap();
        assert_eq!(deeper.get("depth").as_int().unwrap(), 2);
    }

    #[test]
    fn multi_line_string_uses_text() {
        let props = parse(
            "<properties><property name=\"note\">line one\nline two</property></properties>",
        )
        .unwrap();
        assert_eq!(props.get("note").as_str().unwrap(), "line one\nline two");
    }

    #[test]
    fn wrong_accessor_is_type_mismatch() {
        let props = parse(r#"<properties><property name="n" type="int" value="1"/></properties>"#)
            .unwrap();
        match props.get("n").as_str() {
            Err(Error::TypeMismatch { expected, found }) => {
                assert_eq!(expected, "string");
                assert_eq!(found, "int");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            props.get("absent").as_int(),
            Err(Error::TypeMismatch { found: "nothing", .. })
        ));
    }

    #[test]
    fn structural_and_format_errors() {
        assert!(matches!(
            parse(r#"<properties><property value="1"/></properties>"#),
            Err(Error::Missing(_))
        ));
        assert!(matches!(
            parse(r#"<properties><property name="n" type="int"/></properties>"#),
            Err(Error::Missing(_))
        ));
        assert!(matches!(
            parse(r#"<properties><property name="n" type="int" value="x"/></properties>"#),
            Err(Error::Format { .. })
        ));
        assert!(matches!(
            parse(r#"<properties><property name="b" type="bool" value="yes"/></properties>"#),
            Err(Error::Format { .. })
        ));
        assert!(matches!(
            parse(r##"<properties><property name="c" type="color" value="#12"/></properties>"##),
            Err(Error::InvalidColor(_))
        ));
        assert!(matches!(
            parse(r#"<properties><property name="v" type="vector" value="1"/></properties>"#),
            Err(Error::Format { .. })
        ));
    }
}
