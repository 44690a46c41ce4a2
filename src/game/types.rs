use std::collections::VecDeque;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::tuning::Tuning;

// ── Newtypes ────────────────────────────────────────────────────────

/// Stable player slot, also used as the foreign key on projectiles and tallies.
pub type PlayerId = usize;

/// Countdown in seconds. Always >= 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Seconds(pub f32);

impl Seconds {
    pub fn new(v: f32) -> Self {
        Self(v.max(0.0))
    }

    /// Decrement by dt, clamped to 0.
    pub fn dec(self, dt: f32) -> Self {
        Self((self.0 - dt).max(0.0))
    }

    pub fn is_expired(self) -> bool {
        self.0 <= 0.0
    }
}

/// Horizontal facing. Screen space: +x is right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Who fired a projectile. Environment-owned shots never credit a kill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shooter {
    Player(PlayerId),
    Environment,
}

// ── Trail buffer ────────────────────────────────────────────────────

pub const PROJECTILE_TRAIL_CAP: usize = 30;
pub const GRENADE_TRAIL_CAP: usize = 25;

/// Recent positions of a moving entity, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    points: VecDeque<Vec2>,
    cap: usize,
}

impl Trail {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(cap + 1),
            cap,
        }
    }

    pub fn push(&mut self, point: Vec2) {
        self.points.push_back(point);
        while self.points.len() > self.cap {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }
}

// ── Randomness ──────────────────────────────────────────────────────

/// The only randomness source of the simulation.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub ChaCha8Rng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl FromWorld for SimRng {
    fn from_world(world: &mut World) -> Self {
        let seed = world.get_resource::<Tuning>().map_or(0, |t| t.seed);
        Self::seeded(seed)
    }
}

// ── Geometry ────────────────────────────────────────────────────────

/// Strict AABB overlap: touching edges do not count.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/// Rect from a top-left corner and a size (y grows downward).
pub fn rect_at(top_left: Vec2, size: Vec2) -> Rect {
    Rect::from_corners(top_left, top_left + size)
}
