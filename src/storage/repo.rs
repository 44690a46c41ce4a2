use std::path::PathBuf;

use bevy::prelude::*;

use crate::game::grid::TileGrid;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Failed to read map file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid map header: {0:?}")]
    BadHeader(String),

    #[error("Map ended after {found} of {expected} cells")]
    Truncated { expected: usize, found: usize },

    #[error("Map rows have different widths")]
    Ragged,

    #[error("No map named {0:?}")]
    Unknown(String),
}

/// Repository trait for level geometry.
pub trait MapRepository: Send + Sync {
    fn load(&self, id: &str) -> Result<TileGrid, MapError>;
}

/// The map source the round loop pulls from.
#[derive(Resource)]
pub struct MapLibrary(pub Box<dyn MapRepository>);

impl MapLibrary {
    pub fn new(repo: impl MapRepository + 'static) -> Self {
        Self(Box::new(repo))
    }

    /// Load a map, degrading to an empty grid on any error.
    pub fn load_or_empty(&self, id: &str) -> TileGrid {
        match self.0.load(id) {
            Ok(grid) => grid,
            Err(e) => {
                error!("Failed to load map {id:?}: {e}");
                TileGrid::empty()
            }
        }
    }
}
