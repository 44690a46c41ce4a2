use bevy::prelude::*;

use super::types::{rect_at, rects_overlap};

/// Edge length of one grid cell in world units.
pub const TILE_SIZE: f32 = 64.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Empty,
    Solid,
}

/// Inclusive cell range covered by a shape, already clamped to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

/// Static level geometry for one round. Row-major, every row the same width.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl TileGrid {
    /// Build from rows; `None` if the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Parse an ASCII picture: `#` is Solid, anything else Empty.
    pub fn from_ascii(picture: &str) -> Option<Self> {
        let rows = picture
            .lines()
            .map(|line| {
                line.bytes()
                    .map(|b| if b == b'#' { Tile::Solid } else { Tile::Empty })
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Extent of the grid in world units.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * TILE_SIZE
    }

    pub fn tile(&self, x: usize, y: usize) -> Tile {
        if x >= self.width || y >= self.height {
            return Tile::Empty;
        }
        self.cells[y * self.width + x]
    }

    pub fn is_solid(&self, x: usize, y: usize) -> bool {
        self.tile(x, y) == Tile::Solid
    }

    pub fn cell_rect(x: usize, y: usize) -> Rect {
        rect_at(
            Vec2::new(x as f32, y as f32) * TILE_SIZE,
            Vec2::splat(TILE_SIZE),
        )
    }

    /// Cells touched by `bounds`, or `None` when it lies entirely off the grid.
    pub fn cell_range(&self, bounds: Rect) -> Option<CellRange> {
        if self.is_empty() {
            return None;
        }
        let last_col = self.width as i64 - 1;
        let last_row = self.height as i64 - 1;
        let left = ((bounds.min.x / TILE_SIZE).floor() as i64).max(0);
        let right = ((bounds.max.x / TILE_SIZE).floor() as i64).min(last_col);
        let top = ((bounds.min.y / TILE_SIZE).floor() as i64).max(0);
        let bottom = ((bounds.max.y / TILE_SIZE).floor() as i64).min(last_row);
        if left > right || top > bottom {
            return None;
        }
        Some(CellRange {
            left: left as usize,
            right: right as usize,
            top: top as usize,
            bottom: bottom as usize,
        })
    }

    /// Does the box intersect any Solid cell?
    pub fn overlaps_rect(&self, rect: Rect) -> bool {
        let Some(range) = self.cell_range(rect) else {
            return false;
        };
        for y in range.top..=range.bottom {
            for x in range.left..=range.right {
                if self.is_solid(x, y) && rects_overlap(rect, Self::cell_rect(x, y)) {
                    return true;
                }
            }
        }
        false
    }

    /// Does the circle intersect any Solid cell? Closest-point test per cell.
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let bounds = Rect::from_center_half_size(center, Vec2::splat(radius));
        let Some(range) = self.cell_range(bounds) else {
            return false;
        };
        for y in range.top..=range.bottom {
            for x in range.left..=range.right {
                if self.is_solid(x, y) && circle_overlaps_rect(center, radius, Self::cell_rect(x, y)) {
                    return true;
                }
            }
        }
        false
    }
}

pub fn circle_overlaps_rect(center: Vec2, radius: f32, rect: Rect) -> bool {
    let closest = center.clamp(rect.min, rect.max);
    center.distance_squared(closest) < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_grid() -> TileGrid {
        TileGrid::from_ascii("....\n....\n####").expect("grid")
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(TileGrid::from_ascii("##\n#").is_none());
    }

    #[test]
    fn box_resting_on_floor_does_not_overlap() {
        let grid = floor_grid();
        let on_top = rect_at(Vec2::new(10.0, 28.0), Vec2::new(50.0, 100.0));
        assert!(!grid.overlaps_rect(on_top));
        let sunk = rect_at(Vec2::new(10.0, 29.0), Vec2::new(50.0, 100.0));
        assert!(grid.overlaps_rect(sunk));
    }

    #[test]
    fn shapes_off_the_grid_never_collide() {
        let grid = floor_grid();
        assert!(!grid.overlaps_rect(rect_at(Vec2::new(-500.0, 150.0), Vec2::splat(20.0))));
        assert!(!grid.overlaps_rect(rect_at(Vec2::new(1000.0, 150.0), Vec2::splat(20.0))));
        assert!(!TileGrid::empty().overlaps_rect(rect_at(Vec2::ZERO, Vec2::splat(500.0))));
    }

    #[test]
    fn circle_uses_closest_point_not_bounding_box() {
        let grid = TileGrid::from_ascii("..\n.#").expect("grid");
        // Bounding box clips the solid corner cell, the circle itself does not.
        let center = Vec2::new(56.0, 56.0);
        assert!(!grid.overlaps_circle(center, 11.0));
        assert!(grid.overlaps_circle(center, 12.0));
    }

    #[test]
    fn pixel_size_scales_by_tile() {
        assert_eq!(floor_grid().pixel_size(), Vec2::new(256.0, 192.0));
    }
}
