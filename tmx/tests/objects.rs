//! Object groups, image layers, groups and typed properties.
use std::path::{Path, PathBuf};

use tmx::color::Color;
use tmx::layer::DrawOrder;
use tmx::map::Orientation;
use tmx::object::Shape;
use tmx::properties::PropertyValue;
use tmx::text::{HAlign, VAlign};
use tmx::types::Point;
use tmx::{Error, Map};

fn asset(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/assets").join(name)
}

fn objects_map() -> Map {
    Map::parse_file(asset("objects.tmx")).unwrap()
}

#[test]
fn map_properties() {
    let map = objects_map();
    assert_eq!(map.class, "Dungeon");
    assert_eq!(map.orientation, Orientation::Isometric);
    assert_eq!(map.background_color, Color::rgba(0x20, 0x20, 0x20, 0x40));

    let props = &map.properties;
    assert_eq!(props.len(), 4);
    assert_eq!(props.get("title").as_str().unwrap(), "Crypt");
    assert_eq!(props.get("lore").as_str().unwrap(), "First line\nSecond line");
    assert_eq!(
        props.get("ambient").as_color().unwrap(),
        Color::rgba(0x33, 0x66, 0x99, 0xff)
    );

    let spawner = props.get("spawner");
    assert!(matches!(spawner, PropertyValue::Class { property_type, .. } if property_type == "Spawner"));
    let nested = spawner.as_class().unwrap();
    assert_eq!(nested.get("rate").as_float().unwrap(), 2.5);
    assert_eq!(nested.get("target").as_object().unwrap(), 3);

    let names: Vec<&str> = props.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["ambient", "lore", "spawner", "title"]);
}

#[test]
fn tile_layer_flags() {
    let map = objects_map();
    let floor = &map.layers[0];
    assert_eq!(floor.opacity, 0.75);
    assert_eq!(floor.tint_color, Color::rgba(0xff, 0x80, 0x80, 0xff));

    let grid = floor.tile_layer().unwrap();
    assert_eq!(grid.tile_index(1, 1).unwrap(), 2);
    assert!(grid.flip_horizontal(1, 1).unwrap() && grid.flip_vertical(1, 1).unwrap());
    assert!(grid.flip_diagonal(2, 2).unwrap());
    assert!(grid.rotate_hex_120(3, 3).unwrap());
    assert_eq!(grid.tile_index(3, 3).unwrap(), 1);
}

#[test]
fn object_group() {
    let map = objects_map();
    let layer = &map.layers[1];
    assert_eq!(layer.name, "entities");
    assert_eq!(layer.offset, Point { x: 2.0, y: -3.5 });

    let group = layer.object_group().unwrap();
    assert_eq!(group.color, Color::rgba(0xa0, 0xa0, 0xa4, 0xff));
    assert_eq!(group.draw_order, DrawOrder::Index);
    assert_eq!(group.objects.len(), 8);

    let kinds: Vec<&str> = group.objects.iter().map(|o| o.shape.name()).collect();
    assert_eq!(
        kinds,
        ["rectangle", "ellipse", "point", "polygon", "polyline", "text", "rectangle", "rectangle"]
    );

    let area = &group.objects[0];
    assert_eq!(area.class, "Trigger");
    assert_eq!(area.rotation, 45.0);
    assert_eq!(area.size, Point { x: 64.0, y: 32.0 });
    assert!(!area.properties.get("once").as_bool().unwrap());

    let wall = &group.objects[3];
    assert_eq!(wall.polygon().unwrap().len(), 4);
    assert_eq!(wall.polygon().unwrap()[2], Point { x: 32.0, y: 16.0 });

    let path = &group.objects[4];
    assert!(!path.visible);
    assert_eq!(path.polyline().unwrap()[1], Point { x: 8.5, y: 4.25 });

    let sign = group.objects[5].text().unwrap();
    assert_eq!(sign.text, "Beware & flee");
    assert_eq!(sign.font_family, "Serif");
    assert_eq!(sign.pixel_size, 12);
    assert!(sign.wrap && sign.bold && sign.italic && !sign.underline);
    assert!(sign.kerning);
    assert_eq!(sign.color, Color::rgba(0xff, 0, 0, 0xff));
    assert_eq!((sign.halign, sign.valign), (HAlign::Right, VAlign::Center));

    let chest = &group.objects[6];
    assert_eq!(chest.gid.tile_index(), 5);
    assert!(chest.gid.flip_horizontal());
    assert_eq!(chest.shape, Shape::Rectangle);
    assert_eq!(map.tileset_for_gid(chest.gid.raw()).unwrap().name, "tiles");
}

#[test]
fn checked_accessors() {
    let map = objects_map();
    let group = map.layers[1].object_group().unwrap();

    let point = &group.objects[2];
    assert_eq!(point.point().unwrap(), Point::default());
    match point.ellipse() {
        Err(Error::TypeMismatch { expected, found }) => {
            assert_eq!((expected, found), ("ellipse", "point"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
        map.layers[1].tile_layer(),
        Err(Error::TypeMismatch { found: "object group", .. })
    ));
}

#[test]
fn group_with_image_layers() {
    let map = objects_map();
    let background = &map.layers[2];
    assert_eq!(background.parallax, Point { x: 0.5, y: 0.25 });

    let group = background.group().unwrap();
    assert_eq!(group.layers.len(), 2);

    let sky = group.layers[0].image_layer().unwrap();
    assert!(sky.repeat_x && !sky.repeat_y);
    let image = sky.image.as_ref().unwrap();
    assert_eq!(image.source, "sky.png");
    assert_eq!(image.transparent_color, Color::rgba(0xff, 0, 0xff, 0xff));
    assert_eq!((image.width, image.height), (640, 360));

    let blank = &group.layers[1];
    assert!(!blank.visible);
    assert!(blank.image_layer().unwrap().image.is_none());

    let names: Vec<&str> = map.all_layers().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["floor", "entities", "background", "sky", "blank"]);
}
