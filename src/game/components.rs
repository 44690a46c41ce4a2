use bevy::prelude::*;

use super::armory::GunHandle;
use super::types::{rect_at, Facing, PlayerId, Seconds};
use crate::config::tuning::{MovementTuning, Tuning};

// ── Movement status ─────────────────────────────────────────────────

/// Independent movement flags. Any combination may be set at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovementStatus {
    pub grounded: bool,
    pub jumping: bool,
    pub sliding: bool,
    pub dashing: bool,
    pub ducking: bool,
    pub alive: bool,
}

impl MovementStatus {
    /// Fresh-spawn flags: standing on the floor and alive.
    pub fn spawned() -> Self {
        Self {
            grounded: true,
            alive: true,
            ..Default::default()
        }
    }
}

// ── Body ────────────────────────────────────────────────────────────

/// Axis-aligned player box. `pos` is the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Height when not ducking or sliding.
    pub standing_height: f32,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            standing_height: size.y,
        }
    }

    pub fn rect(&self) -> Rect {
        rect_at(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Change height while keeping the bottom edge where it is.
    pub fn set_height(&mut self, height: f32) {
        self.pos.y += self.size.y - height;
        self.size.y = height;
    }

    /// This body at a different height, bottom edge fixed.
    pub fn with_height(&self, height: f32) -> Self {
        let mut probe = *self;
        probe.set_height(height);
        probe
    }
}

// ── Player ──────────────────────────────────────────────────────────

/// All simulation state for one player.
#[derive(Component, Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub body: Body,
    pub facing: Facing,
    pub status: MovementStatus,
    pub moves: MovementTuning,
    pub dash_timer: Seconds,
    pub slide_timer: Seconds,
    pub health: i32,
    pub max_health: i32,
    pub hit_flash: Seconds,
    pub respawn_timer: Seconds,
    /// Held gun. A handle, never a pointer: the armory may grow mid-round.
    pub gun: Option<GunHandle>,
    pub grenades: u32,
    pub max_grenades: u32,
    /// Index of the pickup this player overlaps this tick, if any.
    pub nearby_pickup: Option<usize>,
    pub kills: u32,
}

impl Player {
    pub fn new(id: PlayerId, pos: Vec2, tuning: &Tuning) -> Self {
        let moves = tuning.movement;
        Self {
            id,
            body: Body::new(pos, Vec2::new(moves.width, moves.height)),
            facing: Facing::Right,
            status: MovementStatus::spawned(),
            moves,
            dash_timer: Seconds::default(),
            slide_timer: Seconds::default(),
            health: tuning.max_health,
            max_health: tuning.max_health,
            hit_flash: Seconds::default(),
            respawn_timer: Seconds::default(),
            gun: None,
            grenades: tuning.starting_grenades,
            max_grenades: tuning.max_grenades,
            nearby_pickup: None,
            kills: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status.alive
    }

    pub fn can_interact(&self) -> bool {
        self.nearby_pickup.is_some()
    }

    /// Round-start / respawn reset. Kills and grenade stock carry over;
    /// movement and capacity limits are refreshed from the current tuning.
    pub fn reset(&mut self, pos: Vec2, tuning: &Tuning) {
        self.moves = tuning.movement;
        self.max_health = tuning.max_health;
        self.max_grenades = tuning.max_grenades;
        self.grenades = self.grenades.min(self.max_grenades);
        let size = Vec2::new(self.moves.width, self.moves.height);
        self.body = Body::new(pos, size);
        self.facing = Facing::Right;
        self.status = MovementStatus::spawned();
        self.dash_timer = Seconds::default();
        self.slide_timer = Seconds::default();
        self.health = self.max_health;
        self.hit_flash = Seconds::default();
        self.respawn_timer = Seconds::default();
        self.gun = None;
        self.nearby_pickup = None;
    }

    /// Apply one projectile hit. Returns true if this hit was the killing blow.
    pub fn take_hit(&mut self, damage: i32, tuning: &Tuning) -> bool {
        self.health -= damage;
        self.hit_flash = Seconds::new(tuning.hit_flash_secs);
        if self.health <= 0 {
            self.status.alive = false;
            self.respawn_timer = Seconds::new(tuning.respawn_secs);
            return true;
        }
        false
    }

    /// Leave the level without a killer.
    pub fn fall_out(&mut self) {
        self.status.alive = false;
        self.health = 0;
        self.respawn_timer = Seconds::default();
    }
}

/// Sort a roster by player id so every pass sees the same stable order.
pub fn sorted_roster<'a>(players: impl Iterator<Item = Mut<'a, Player>>) -> Vec<&'a mut Player> {
    let mut roster: Vec<&'a mut Player> = players.map(Mut::into_inner).collect();
    roster.sort_by_key(|p| p.id);
    roster
}
