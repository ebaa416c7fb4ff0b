use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use serde::Serialize;
use serde_json::{json, Value};
use simplelog::{ColorChoice, Config, TerminalMode, TermLogger};

use tmx::color::Color;
use tmx::layer::{Layer, LayerKind};
use tmx::object::{Object, Shape};
use tmx::properties::{Properties, PropertyValue};
use tmx::{Map, Tileset};

/// TMX dump CLI: parse tile maps and tilesets and print them as JSON
#[derive(Parser)]
#[command(name = "tmx-dump", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Parse map documents (.tmx) along with their external tilesets
    Map {
        /// Input map files
        #[arg(required = true)]
        files: Vec<String>,

        /// Include tile indices of every tile layer
        #[arg(long)]
        cells: bool,
    },
    /// Parse standalone tileset documents (.tsx)
    Tileset {
        /// Input tileset files
        #[arg(required = true)]
        files: Vec<String>,
    },
}

#[derive(Serialize)]
struct OutputMap {
    file: String,
    version: String,
    tiled_version: String,
    class: String,
    orientation: String,
    render_order: String,
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
    infinite: bool,
    background_color: String,
    tilesets: Vec<OutputTileset>,
    layers: Vec<OutputLayer>,
    properties: BTreeMap<String, Value>,
}

#[derive(Serialize)]
struct OutputTileset {
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    first_gid: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    source: String,
    name: String,
    tile_width: i32,
    tile_height: i32,
    tile_count: u32,
    columns: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    tiles_with_data: usize,
    properties: BTreeMap<String, Value>,
}

#[derive(Serialize)]
struct OutputLayer {
    id: u32,
    name: String,
    kind: &'static str,
    visible: bool,
    opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<[u32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encoding: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compression: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cells: Option<Vec<Vec<u32>>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    objects: Vec<OutputObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    layers: Vec<OutputLayer>,
    properties: BTreeMap<String, Value>,
}

#[derive(Serialize)]
struct OutputObject {
    id: u32,
    name: String,
    shape: &'static str,
    position: [f64; 2],
    size: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    gid: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    points: Vec<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

fn color_string(color: Color) -> String {
    format!(
        "#{:02x}{:02x}{:02x}{:02x}",
        color.a, color.r, color.g, color.b
    )
}

fn property_json(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Empty => Value::Null,
        PropertyValue::String(s) | PropertyValue::File(s) => json!(s),
        PropertyValue::Int(v) => json!(v),
        PropertyValue::Float(v) => json!(v),
        PropertyValue::Bool(v) => json!(v),
        PropertyValue::Color(c) => json!(color_string(*c)),
        PropertyValue::Object(id) => json!(id),
        PropertyValue::Class {
            property_type,
            properties,
        } => json!({
            "type": property_type,
            "properties": properties_json(properties),
        }),
    }
}

fn properties_json(properties: &Properties) -> BTreeMap<String, Value> {
    properties
        .iter()
        .map(|(name, value)| (name.clone(), property_json(value)))
        .collect()
}

fn output_tileset(tileset: &Tileset, file: Option<String>) -> OutputTileset {
    OutputTileset {
        file,
        first_gid: tileset.first_gid,
        source: tileset.source.clone(),
        name: tileset.name.clone(),
        tile_width: tileset.tile_width,
        tile_height: tileset.tile_height,
        tile_count: tileset.tile_count,
        columns: tileset.columns,
        image: tileset.image.as_ref().map(|image| image.source.clone()),
        tiles_with_data: tileset.tiles.len(),
        properties: properties_json(&tileset.properties),
    }
}

fn output_object(object: &Object) -> OutputObject {
    let points = match &object.shape {
        Shape::Polygon(points) | Shape::Polyline(points) => {
            points.iter().map(|p| [p.x, p.y]).collect()
        }
        _ => Vec::new(),
    };
    OutputObject {
        id: object.id,
        name: object.name.clone(),
        shape: object.shape.name(),
        position: [object.position.x, object.position.y],
        size: [object.size.x, object.size.y],
        gid: (!object.gid.is_empty()).then(|| object.gid.raw()),
        points,
        text: object.text().ok().map(|text| text.text.clone()),
    }
}

fn output_layer(layer: &Layer, with_cells: bool) -> OutputLayer {
    let mut output = OutputLayer {
        id: layer.id,
        name: layer.name.clone(),
        kind: layer.kind.name(),
        visible: layer.visible,
        opacity: layer.opacity,
        size: None,
        encoding: None,
        compression: None,
        cells: None,
        objects: Vec::new(),
        image: None,
        layers: Vec::new(),
        properties: properties_json(&layer.properties),
    };

    match &layer.kind {
        LayerKind::Tile(tiles) => {
            output.size = Some([tiles.width(), tiles.height()]);
            output.encoding = Some(tiles.encoding.as_str());
            output.compression = Some(tiles.compression.as_str());
            if with_cells {
                let rows = tiles
                    .cells
                    .rows()
                    .map(|row| row.iter().map(|cell| cell.tile_index()).collect())
                    .collect();
                output.cells = Some(rows);
            }
        }
        LayerKind::Objects(group) => {
            output.objects = group.objects.iter().map(output_object).collect();
        }
        LayerKind::Image(image_layer) => {
            output.image = image_layer.image.as_ref().map(|image| image.source.clone());
        }
        LayerKind::Group(group) => {
            output.layers = group
                .layers
                .iter()
                .map(|child| output_layer(child, with_cells))
                .collect();
        }
    }
    output
}

fn output_map(file: &str, map: &Map, with_cells: bool) -> OutputMap {
    OutputMap {
        file: file.to_owned(),
        version: map.version.clone(),
        tiled_version: map.tiled_version.clone(),
        class: map.class.clone(),
        orientation: map.orientation.to_string(),
        render_order: map.render_order.to_string(),
        width: map.width,
        height: map.height,
        tile_width: map.tile_width,
        tile_height: map.tile_height,
        infinite: map.infinite,
        background_color: color_string(map.background_color),
        tilesets: map
            .tilesets
            .iter()
            .map(|tileset| output_tileset(tileset, None))
            .collect(),
        layers: map
            .layers
            .iter()
            .map(|layer| output_layer(layer, with_cells))
            .collect(),
        properties: properties_json(&map.properties),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("failed to initialize logging")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;

    match cli.command {
        Command::Map { files, cells } => {
            for file in &files {
                info!("parsing map {file}");
                let map = Map::parse_file(Path::new(file))
                    .with_context(|| format!("failed to parse map: {file}"))?;
                info!(
                    "  {} tilesets, {} layers",
                    map.tilesets.len(),
                    map.all_layers().len()
                );
                print_json(&output_map(file, &map, cells), cli.pretty)?;
            }
        }
        Command::Tileset { files } => {
            for file in &files {
                info!("parsing tileset {file}");
                let tileset = Tileset::parse_file(Path::new(file))
                    .with_context(|| format!("failed to parse tileset: {file}"))?;
                print_json(&output_tileset(&tileset, Some(file.clone())), cli.pretty)?;
            }
        }
    }

    Ok(())
}
