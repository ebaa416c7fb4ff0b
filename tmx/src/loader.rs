//! Document loading.
//!
//! Maps reference tilesets by path, so reading a map can pull in further
//! documents. A [`Loader`] turns a path into document text; [`MapReader`]
//! drives parsing with one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::map::Map;
use crate::tileset::Tileset;
use crate::xml::Element;

/// Source of document text.
pub trait Loader {
    fn load(&mut self, path: &Path) -> io::Result<String>;
}

/// Reads documents from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl Loader for FsLoader {
    fn load(&mut self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

impl<F> Loader for F
where
    F: FnMut(&Path) -> io::Result<String>,
{
    fn load(&mut self, path: &Path) -> io::Result<String> {
        self(path)
    }
}

/// Parses maps and tilesets, loading referenced documents through `L`.
///
/// External tilesets are loaded every time they are referenced; nothing is
/// cached between documents.
#[derive(Debug, Default)]
pub struct MapReader<L = FsLoader> {
    loader: L,
}

impl<L: Loader> MapReader<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    pub fn into_loader(self) -> L {
        self.loader
    }

    /// Load and parse the map at `path`. Tileset references resolve against
    /// the directory containing it.
    pub fn read_map(&mut self, path: &Path) -> Result<Map> {
        let text = self.load(path)?;
        self.parse_map(&text, base_dir(path))
    }

    /// Parse map text. Tileset references resolve against `base_dir`.
    pub fn parse_map(&mut self, text: &str, base_dir: &Path) -> Result<Map> {
        let root = Element::parse_document(text)?;
        if root.name != "map" {
            return Err(Error::missing("map root element"));
        }
        Map::from_element(&root, self, base_dir)
    }

    /// Load and parse a standalone tileset document.
    pub fn read_tileset(&mut self, path: &Path) -> Result<Tileset> {
        let text = self.load(path)?;
        Tileset::parse_str(&text)
    }

    /// Resolve a map's `<tileset firstgid=".." source=".."/>` reference.
    ///
    /// The map's `firstgid` and `source` are kept; everything else comes
    /// from the loaded document.
    pub(crate) fn external_tileset(
        &mut self,
        first_gid: u32,
        source: &str,
        base_dir: &Path,
    ) -> Result<Tileset> {
        let path = base_dir.join(source);
        debug!("loading external tileset {}", path.display());
        let mut tileset = self.read_tileset(&path)?;
        tileset.first_gid = first_gid;
        tileset.source = source.to_owned();
        Ok(tileset)
    }

    fn load(&mut self, path: &Path) -> Result<String> {
        self.loader.load(path).map_err(|source| Error::Load {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn base_dir(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new(""))
}

/// In-memory documents keyed by path, for tests and embedded assets.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    documents: Vec<(PathBuf, String)>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.documents.push((path.into(), text.into()));
        self
    }
}

impl Loader for MemoryLoader {
    fn load(&mut self, path: &Path) -> io::Result<String> {
        self.documents
            .iter()
            .find(|(known, _)| known == path)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}
