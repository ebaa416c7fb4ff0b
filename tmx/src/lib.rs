#[macro_use]
pub mod types;
pub mod error;
pub mod xml;
pub mod color;
pub mod cell;
pub mod grid;
pub mod codec;
pub mod properties;
pub mod image;
pub mod text;
pub mod object;
pub mod layer;
pub mod tileset;
pub mod map;
pub mod loader;

pub use error::{Error, Result, Unsupported};
pub use loader::{FsLoader, Loader, MapReader};
pub use map::Map;
pub use tileset::Tileset;
