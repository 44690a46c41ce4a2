use bevy::prelude::*;
use rand::Rng;

use super::grid::{TileGrid, TILE_SIZE};
use super::types::rect_at;

const MAX_ATTEMPTS: usize = 1000;
/// Rows above the floor tile where the drop test starts.
const DROP_START_TILES: i64 = 4;
/// How far the drop test falls before giving up on a candidate.
const DROP_TILES: usize = 6;

/// Pick a free spot for a player box standing on a floor run.
///
/// A floor run is a row of Solid cells, as wide as the player in tiles, with
/// Empty cells directly above. Falls back to the origin with a warning.
pub fn find_spawn(grid: &TileGrid, size: Vec2, rng: &mut impl Rng) -> Vec2 {
    let candidates = floor_runs(grid, size.x);
    if candidates.is_empty() {
        warn!("No valid floor found for spawn, using origin");
        return Vec2::ZERO;
    }

    let tiles_wide = tiles_wide(size.x);
    for _ in 0..MAX_ATTEMPTS {
        let (tx, ty) = candidates[rng.gen_range(0..candidates.len())];
        let x = tx as f32 * TILE_SIZE + (TILE_SIZE * tiles_wide as f32 - size.x) * 0.5;
        let start_y = (ty as i64 - DROP_START_TILES) as f32 * TILE_SIZE;

        let blocked = |y: f32| grid.overlaps_rect(rect_at(Vec2::new(x, y), size));
        let mut y = start_y;
        for drop in 0..(TILE_SIZE as usize * DROP_TILES) {
            y = start_y + drop as f32;
            if blocked(y) {
                y -= 2.0;
                break;
            }
        }
        if !blocked(y) {
            y -= 1.0;
            if !blocked(y) {
                return Vec2::new(x, y);
            }
        }
    }

    warn!("No valid spawn found after {MAX_ATTEMPTS} attempts, using origin");
    Vec2::ZERO
}

/// Random top-left corner inside the grid where a box fits without touching
/// terrain.
pub fn find_free_spot(grid: &TileGrid, size: Vec2, rng: &mut impl Rng) -> Option<Vec2> {
    let extent = grid.pixel_size();
    if grid.is_empty() || extent.x < size.x || extent.y < size.y {
        return None;
    }
    let max_x = (extent.x - size.x) as i32;
    let max_y = (extent.y - size.y) as i32;
    (0..MAX_ATTEMPTS)
        .map(|_| {
            Vec2::new(
                rng.gen_range(0..=max_x) as f32,
                rng.gen_range(0..=max_y) as f32,
            )
        })
        .find(|&pos| !grid.overlaps_rect(rect_at(pos, size)))
}

fn tiles_wide(width: f32) -> usize {
    ((width / TILE_SIZE).ceil() as usize).max(1)
}

/// Left cell of every floor run, bottom row first.
fn floor_runs(grid: &TileGrid, width: f32) -> Vec<(usize, usize)> {
    let run = tiles_wide(width);
    if grid.width() < run {
        return Vec::new();
    }
    let mut out = Vec::new();
    for y in (1..grid.height()).rev() {
        for x in 0..=(grid.width() - run) {
            let is_floor = (x..x + run).all(|cx| grid.is_solid(cx, y) && !grid.is_solid(cx, y - 1));
            if is_floor {
                out.push((x, y));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const PLAYER: Vec2 = Vec2::new(75.0, 100.0);

    #[test]
    fn spawn_lands_just_above_floor() {
        let grid = TileGrid::from_ascii(
            "........\n\
             ........\n\
             ........\n\
             ........\n\
             ........\n\
             ########",
        )
        .expect("grid");
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let pos = find_spawn(&grid, PLAYER, &mut rng);
            let rect = rect_at(pos, PLAYER);
            assert!(!grid.overlaps_rect(rect));
            // Floor top is y = 320; the spawn sits within a few pixels of it.
            assert!(rect.max.y <= 320.0 && rect.max.y >= 316.0, "bottom at {}", rect.max.y);
        }
    }

    #[test]
    fn no_floor_falls_back_to_origin() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(find_spawn(&TileGrid::empty(), PLAYER, &mut rng), Vec2::ZERO);
        let open = TileGrid::from_ascii("....\n....").expect("grid");
        assert_eq!(find_spawn(&open, PLAYER, &mut rng), Vec2::ZERO);
    }

    #[test]
    fn floor_runs_need_headroom() {
        let grid = TileGrid::from_ascii("#...\n####").expect("grid");
        // Cell (0, 1) has a Solid cell above it; runs are two tiles wide.
        assert_eq!(floor_runs(&grid, 75.0), vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn free_spot_avoids_terrain() {
        let grid = TileGrid::from_ascii("....\n.##.\n....").expect("grid");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let size = Vec2::new(60.0, 30.0);
        for _ in 0..50 {
            let pos = find_free_spot(&grid, size, &mut rng).expect("spot");
            assert!(!grid.overlaps_rect(rect_at(pos, size)));
            assert!(pos.x + size.x <= 256.0 && pos.y + size.y <= 192.0);
        }
        assert!(find_free_spot(&TileGrid::empty(), size, &mut rng).is_none());
    }
}
