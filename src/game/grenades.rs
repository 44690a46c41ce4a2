use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use super::collision::circle_rect_contact;
use super::combat::Projectile;
use super::components::Player;
use super::events::CombatEvent;
use super::grid::TileGrid;
use super::intent::{Action, ActionSource};
use super::types::{Seconds, Shooter, Trail, GRENADE_TRAIL_CAP};
use crate::config::tuning::GrenadeSpec;

/// Horizontal distance from the thrower's centre to the release point.
const THROW_OFFSET: f32 = 40.0;
/// Release height as a fraction of the thrower's box.
const THROW_HEIGHT: f32 = 0.4;
/// Share of the thrower's velocity carried by the grenade.
const THROW_INHERIT: f32 = 0.5;
/// Share of a touching player's velocity passed on as a kick.
const KICK_SHARE: f32 = 0.2;
/// Rolling friction, applied to horizontal speed every tick.
const ROLL_DAMPING: f32 = 0.98;
const REST_VERTICAL: f32 = 0.1;
const REST_HORIZONTAL: f32 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Grenade {
    /// Centre of the circle.
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub fuse: Seconds,
    pub bounce: f32,
    pub exploded: bool,
    pub trail: Trail,
}

impl Grenade {
    pub fn new(pos: Vec2, vel: Vec2, spec: &GrenadeSpec) -> Self {
        Self {
            pos,
            vel,
            radius: spec.radius,
            fuse: Seconds::new(spec.fuse),
            bounce: spec.bounce,
            exploded: false,
            trail: Trail::with_cap(GRENADE_TRAIL_CAP),
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Grenades(pub Vec<Grenade>);

/// Throw a grenade on a fresh press, if the player has one.
pub fn try_throw(player: &mut Player, input: &impl ActionSource, spec: &GrenadeSpec) -> Option<Grenade> {
    if !input.is_pressed(Action::Grenade) || player.grenades == 0 {
        return None;
    }
    player.grenades -= 1;

    let facing = player.facing.sign();
    let dir = Vec2::new(facing * spec.throw_angle.cos(), -spec.throw_angle.sin());
    let vel = dir * spec.throw_speed + player.body.vel * THROW_INHERIT;
    let body = &player.body;
    let pos = Vec2::new(
        body.pos.x + body.size.x * 0.5 + facing * THROW_OFFSET,
        body.pos.y + body.size.y * THROW_HEIGHT,
    );
    Some(Grenade::new(pos, vel, spec))
}

/// Ring of environment-owned fragments centred on `center`.
pub fn burst(center: Vec2, spec: &GrenadeSpec, rng: &mut impl Rng) -> Vec<Projectile> {
    let count = spec.fragment_count.max(1);
    let half_jitter = spec.fragment_jitter * 0.5;
    (0..count)
        .map(|i| {
            let mut angle = i as f32 * TAU / count as f32;
            if half_jitter > 0.0 {
                angle += rng.gen_range(-half_jitter..half_jitter);
            }
            Projectile::new(
                center,
                Vec2::from_angle(angle) * spec.fragment_speed,
                spec.fragment_range,
                Shooter::Environment,
            )
        })
        .collect()
}

/// Advance every grenade one tick. Detonations append their fragments to
/// `projectiles` and remove the grenade in the same tick.
pub fn advance_grenades(
    grenades: &mut Vec<Grenade>,
    projectiles: &mut Vec<Projectile>,
    players: &[&Player],
    grid: &TileGrid,
    spec: &GrenadeSpec,
    rng: &mut impl Rng,
    dt: f32,
) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    let mut i = 0;
    while i < grenades.len() {
        let grenade = &mut grenades[i];
        grenade.trail.push(grenade.pos);
        grenade.fuse = grenade.fuse.dec(dt);
        if grenade.fuse.is_expired() && !grenade.exploded {
            grenade.exploded = true;
            let fragments = burst(grenade.pos, spec, rng);
            events.push(CombatEvent::GrenadeExploded {
                at: grenade.pos,
                fragments: fragments.len(),
            });
            debug!("Grenade exploded at {:?}", grenade.pos);
            projectiles.extend(fragments);
        }
        if grenade.exploded {
            grenades.swap_remove(i);
            continue;
        }

        fly(grenade, grid, spec, dt);
        for &player in players.iter().filter(|p| p.is_alive()) {
            kick(grenade, player);
        }
        i += 1;
    }
    events
}

/// Gravity plus axis-separated bounces against the grid.
fn fly(grenade: &mut Grenade, grid: &TileGrid, spec: &GrenadeSpec, dt: f32) {
    grenade.vel.y += spec.gravity * dt;

    let next_x = grenade.pos.x + grenade.vel.x * dt;
    if grid.overlaps_circle(Vec2::new(next_x, grenade.pos.y), grenade.radius) {
        grenade.vel.x = -grenade.vel.x * grenade.bounce;
    } else {
        grenade.pos.x = next_x;
    }

    let mut landed = false;
    let next_y = grenade.pos.y + grenade.vel.y * dt;
    if grid.overlaps_circle(Vec2::new(grenade.pos.x, next_y), grenade.radius) {
        landed = grenade.vel.y > 0.0;
        grenade.vel.y = reflect(grenade.vel.y, grenade.bounce, spec.min_bounce_speed);
    } else {
        grenade.pos.y = next_y;
    }

    grenade.vel.x *= ROLL_DAMPING;
    if landed && grenade.vel.y.abs() < REST_VERTICAL && grenade.vel.x.abs() < REST_HORIZONTAL {
        grenade.vel = Vec2::ZERO;
    }
}

/// Reverse and damp one velocity component; slow bounces die out.
fn reflect(v: f32, bounce: f32, min_speed: f32) -> f32 {
    let out = -v * bounce;
    if out.abs() < min_speed { 0.0 } else { out }
}

/// Push a grenade out of a player's box and let the player kick it.
fn kick(grenade: &mut Grenade, player: &Player) {
    let Some(contact) = circle_rect_contact(grenade.pos, grenade.radius, player.body.rect()) else {
        return;
    };
    grenade.pos += contact.normal * contact.depth;
    let vn = grenade.vel.dot(contact.normal);
    if vn < 0.0 {
        grenade.vel -= (1.0 + grenade.bounce) * vn * contact.normal;
    }
    grenade.vel += player.body.vel * KICK_SHARE;
    grenade.vel *= ROLL_DAMPING;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tuning::Tuning;
    use crate::game::intent::ActionState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn spec() -> GrenadeSpec {
        GrenadeSpec::default()
    }

    fn floor() -> TileGrid {
        TileGrid::from_ascii("......\n......\n######").expect("grid")
    }

    #[test]
    fn throw_consumes_and_arcs_upward() {
        let tuning = Tuning::default();
        let mut p = Player::new(0, Vec2::new(100.0, 100.0), &tuning);
        let mut input = ActionState::default();
        input.press(Action::Grenade);

        let g = try_throw(&mut p, &input, &tuning.grenade).expect("grenade");
        assert_eq!(p.grenades, tuning.starting_grenades - 1);
        assert!(g.vel.x > 0.0 && g.vel.y < 0.0);
        assert_eq!(g.pos, Vec2::new(100.0 + 37.5 + 40.0, 140.0));

        p.grenades = 0;
        assert!(try_throw(&mut p, &input, &tuning.grenade).is_none());
    }

    #[test]
    fn throw_inherits_half_the_thrower_velocity() {
        let tuning = Tuning::default();
        let spec = tuning.grenade;
        let mut input = ActionState::default();
        input.press(Action::Grenade);

        let mut still = Player::new(0, Vec2::new(100.0, 100.0), &tuning);
        let base = try_throw(&mut still, &input, &spec).expect("grenade").vel;

        let mut running = Player::new(1, Vec2::new(100.0, 100.0), &tuning);
        running.body.vel = Vec2::new(200.0, -100.0);
        let moving = try_throw(&mut running, &input, &spec).expect("grenade").vel;

        let expected = base + Vec2::new(100.0, -50.0);
        assert!((moving - expected).length() < 1e-3, "{moving:?} vs {expected:?}");
        let dir = Vec2::new(spec.throw_angle.cos(), -spec.throw_angle.sin());
        assert!((base - dir * spec.throw_speed).length() < 1e-3);
    }

    #[test]
    fn short_fuse_explodes_next_tick_into_environment_fragments() {
        let spec = spec();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut g = Grenade::new(Vec2::new(100.0, 50.0), Vec2::ZERO, &spec);
        g.fuse = Seconds::new(0.016);
        let mut grenades = vec![g];
        let mut projectiles = Vec::new();

        let events = advance_grenades(&mut grenades, &mut projectiles, &[], &TileGrid::empty(), &spec, &mut rng, 0.02);
        assert!(grenades.is_empty());
        assert_eq!(projectiles.len(), spec.fragment_count as usize);
        assert!(projectiles.iter().all(|p| p.owner == Shooter::Environment));
        assert!(projectiles.iter().all(|p| p.max_distance == spec.fragment_range));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn fragments_are_evenly_spread_with_small_jitter() {
        let spec = spec();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let frags = burst(Vec2::ZERO, &spec, &mut rng);
        let step = TAU / spec.fragment_count as f32;
        for (i, frag) in frags.iter().enumerate() {
            let expected = Vec2::from_angle(i as f32 * step);
            let off = expected.angle_to(frag.vel).abs();
            assert!(off <= spec.fragment_jitter * 0.5 + 1e-4, "fragment {i} off by {off}");
        }
    }

    #[test]
    fn vertical_bounce_scales_by_coefficient() {
        let spec = spec();
        let mut g = Grenade::new(Vec2::new(100.0, 110.0), Vec2::new(0.0, 600.0), &spec);
        let dt = 1.0 / 60.0;
        let before = g.vel.y + spec.gravity * dt;
        fly(&mut g, &floor(), &spec, dt);
        assert!((g.vel.y + before * spec.bounce).abs() < 1e-3);
        assert!(g.pos.y + g.radius <= 128.0);
    }

    #[test]
    fn slow_bounce_snaps_to_zero() {
        assert_eq!(reflect(50.0, 0.8, 60.0), 0.0);
        assert_eq!(reflect(100.0, 0.8, 60.0), -80.0);
        assert_eq!(reflect(-100.0, 0.8, 60.0), 80.0);
    }

    #[test]
    fn wall_reflects_horizontal_velocity() {
        let spec = spec();
        let grid = TileGrid::from_ascii("..#\n..#").expect("grid");
        let mut g = Grenade::new(Vec2::new(110.0, 40.0), Vec2::new(600.0, 0.0), &spec);
        fly(&mut g, &grid, &spec, 1.0 / 60.0);
        assert_eq!(g.pos.x, 110.0);
        assert!((g.vel.x + 600.0 * spec.bounce * ROLL_DAMPING).abs() < 1e-3);
    }

    #[test]
    fn grenade_comes_to_rest_on_floor() {
        let spec = spec();
        let grid = floor();
        let mut g = Grenade::new(Vec2::new(100.0, 60.0), Vec2::new(120.0, 0.0), &spec);
        for _ in 0..600 {
            fly(&mut g, &grid, &spec, 1.0 / 60.0);
            assert!(!grid.overlaps_circle(g.pos, g.radius));
        }
        assert_eq!(g.vel, Vec2::ZERO);
    }

    #[test]
    fn player_kick_pushes_out_and_reflects() {
        let tuning = Tuning::default();
        let mut p = Player::new(0, Vec2::new(200.0, 0.0), &tuning);
        p.body.vel = Vec2::new(-100.0, 0.0);
        let mut g = Grenade::new(Vec2::new(190.0, 50.0), Vec2::new(300.0, 0.0), &tuning.grenade);
        kick(&mut g, &p);
        assert!((g.pos.x - 188.0).abs() < 1e-4);
        let expected = (300.0 - 1.8 * 300.0 + -100.0 * KICK_SHARE) * ROLL_DAMPING;
        assert!((g.vel.x - expected).abs() < 1e-3);
    }
}
