use std::f32::consts::PI;

use bevy::prelude::*;
use rand::Rng;

use super::armory::{Armory, GunHandle};
use super::components::Player;
use super::events::CombatEvent;
use super::grid::TileGrid;
use super::intent::{Action, ActionSource};
use super::types::{rect_at, rects_overlap, Facing, Seconds, Shooter, Trail, PROJECTILE_TRAIL_CAP};
use crate::config::tuning::Tuning;

/// Hitbox of every projectile, anchored at its position.
pub const PROJECTILE_SIZE: Vec2 = Vec2::splat(8.0);
/// Extra spread multiplier while the shooter is airborne.
const AIRBORNE_SPREAD: f32 = 2.5;
/// Shoulder height as a fraction of the player box.
const SHOULDER_HEIGHT: f32 = 0.3;
const MUZZLE_OFFSET: f32 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Distance covered so far; never decreases.
    pub traveled: f32,
    pub max_distance: f32,
    pub owner: Shooter,
    pub trail: Trail,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, max_distance: f32, owner: Shooter) -> Self {
        Self {
            pos,
            vel,
            traveled: 0.0,
            max_distance,
            owner,
            trail: Trail::with_cap(PROJECTILE_TRAIL_CAP),
        }
    }

    pub fn rect(&self) -> Rect {
        rect_at(self.pos, PROJECTILE_SIZE)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Projectiles(pub Vec<Projectile>);

/// Result of a shooting attempt that changed something.
#[derive(Debug, Clone, PartialEq)]
pub enum Shot {
    Fired(Projectile),
    /// The held gun was empty (or gone) and has been let go.
    Dropped(GunHandle),
}

/// Tick the held gun's cooldown and fire if the trigger is down.
pub fn try_fire(
    player: &mut Player,
    input: &impl ActionSource,
    armory: &mut Armory,
    rng: &mut impl Rng,
    dt: f32,
) -> Option<Shot> {
    let handle = player.gun?;
    let Some(gun) = armory.get_mut(handle).filter(|g| g.ammo > 0) else {
        player.gun = None;
        return Some(Shot::Dropped(handle));
    };

    gun.cooldown = gun.cooldown.dec(dt);
    if !input.is_down(Action::Fire) || !gun.cooldown.is_expired() {
        return None;
    }
    gun.cooldown = Seconds::new(1.0 / gun.fire_rate);
    gun.ammo -= 1;

    let base_angle = match player.facing {
        Facing::Left => PI,
        Facing::Right => 0.0,
    };
    let speed_factor = (player.body.vel.x.abs() / player.moves.max_vel).min(1.0);
    let air_factor = if player.status.grounded { 0.0 } else { AIRBORNE_SPREAD };
    let spread = gun.spread * (1.0 + speed_factor + air_factor);
    let angle = base_angle + rng.gen_range(-0.5f32..0.5) * spread;
    let vel = Vec2::from_angle(angle) * gun.projectile_speed;

    let body = &player.body;
    let shoulder = match player.facing {
        Facing::Left => Vec2::new(body.pos.x - MUZZLE_OFFSET, body.pos.y),
        Facing::Right => Vec2::new(body.pos.x + body.size.x + MUZZLE_OFFSET, body.pos.y),
    } + Vec2::new(0.0, body.size.y * SHOULDER_HEIGHT);

    Some(Shot::Fired(Projectile::new(
        shoulder,
        vel,
        gun.range,
        Shooter::Player(player.id),
    )))
}

/// Move every projectile one step and resolve range, terrain and player hits.
///
/// `players` must be in slot order: the first overlapping live player takes
/// the hit.
pub fn advance_projectiles(
    projectiles: &mut Vec<Projectile>,
    players: &mut [&mut Player],
    grid: &TileGrid,
    tuning: &Tuning,
    dt: f32,
) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    let mut i = 0;
    while i < projectiles.len() {
        let shot = &mut projectiles[i];
        let step = shot.vel * dt;
        shot.pos += step;
        shot.trail.push(shot.pos);
        shot.traveled += step.length();

        let rect = shot.rect();
        let owner = shot.owner;
        let spent = shot.traveled >= shot.max_distance || grid.overlaps_rect(rect);
        if spent || hit_first_player(rect, owner, players, tuning, &mut events) {
            projectiles.swap_remove(i);
        } else {
            i += 1;
        }
    }
    events
}

fn hit_first_player(
    rect: Rect,
    owner: Shooter,
    players: &mut [&mut Player],
    tuning: &Tuning,
    events: &mut Vec<CombatEvent>,
) -> bool {
    let Some(victim) = players
        .iter_mut()
        .find(|p| p.is_alive() && rects_overlap(rect, p.body.rect()))
    else {
        return false;
    };

    let killed = victim.take_hit(tuning.projectile_damage, tuning);
    let victim_id = victim.id;
    events.push(CombatEvent::PlayerHit {
        victim: victim_id,
        shooter: owner,
        health: victim.health,
    });
    if killed {
        let killer = match owner {
            Shooter::Player(id) => players.iter_mut().find(|p| p.id == id).map(|p| {
                p.kills += 1;
                p.id
            }),
            Shooter::Environment => None,
        };
        info!("Player {victim_id} killed by {killer:?}");
        events.push(CombatEvent::PlayerKilled {
            victim: victim_id,
            killer,
        });
    }
    true
}
