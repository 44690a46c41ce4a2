use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::game::grid::{Tile, TileGrid};
use crate::storage::repo::{MapError, MapLibrary, MapRepository};

/// Directory the shipped maps live in.
pub const DEFAULT_MAP_DIR: &str = "assets/maps";

/// Parse the `.map` text format.
///
/// First line: `<width> <height>`. Then `width * height` cell bytes, row
/// major; `#` is Solid, any other byte Empty. Line breaks are skipped, so
/// rows may be wrapped freely.
pub fn parse_map(text: &str) -> Result<TileGrid, MapError> {
    let (header, body) = text.split_once('\n').unwrap_or((text, ""));
    let mut dims = header.split_whitespace().map(str::parse::<usize>);
    let (width, height) = match (dims.next(), dims.next(), dims.next()) {
        (Some(Ok(w)), Some(Ok(h)), None) => (w, h),
        _ => return Err(MapError::BadHeader(header.trim().to_string())),
    };

    let expected = width
        .checked_mul(height)
        .ok_or_else(|| MapError::BadHeader(header.trim().to_string()))?;
    let cells: Vec<Tile> = body
        .bytes()
        .filter(|b| *b != b'\n' && *b != b'\r')
        .take(expected)
        .map(|b| if b == b'#' { Tile::Solid } else { Tile::Empty })
        .collect();
    if cells.len() < expected {
        return Err(MapError::Truncated {
            expected,
            found: cells.len(),
        });
    }

    let rows = cells.chunks(width.max(1)).map(<[Tile]>::to_vec).collect();
    TileGrid::from_rows(rows).ok_or(MapError::Ragged)
}

/// Maps stored as `<root>/<id>.map`.
#[derive(Debug, Clone)]
pub struct DirectoryMaps {
    root: PathBuf,
}

impl DirectoryMaps {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.map"))
    }
}

impl MapRepository for DirectoryMaps {
    fn load(&self, id: &str) -> Result<TileGrid, MapError> {
        let path = self.path_for(id);
        let text = std::fs::read_to_string(&path).map_err(|source| MapError::Io { path, source })?;
        parse_map(&text)
    }
}

/// Maps held as ASCII pictures, one string per row. Used by tests and tools.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMaps {
    maps: HashMap<String, String>,
}

impl InMemoryMaps {
    pub fn with(mut self, id: &str, picture: &str) -> Self {
        self.insert(id, picture);
        self
    }

    pub fn insert(&mut self, id: &str, picture: &str) {
        self.maps.insert(id.to_string(), picture.to_string());
    }
}

impl MapRepository for InMemoryMaps {
    fn load(&self, id: &str) -> Result<TileGrid, MapError> {
        let picture = self
            .maps
            .get(id)
            .ok_or_else(|| MapError::Unknown(id.to_string()))?;
        TileGrid::from_ascii(picture).ok_or(MapError::Ragged)
    }
}

impl Default for MapLibrary {
    fn default() -> Self {
        Self::new(DirectoryMaps::new(DEFAULT_MAP_DIR))
    }
}
