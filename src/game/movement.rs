use super::collision::resolve_motion;
use super::components::Player;
use super::grid::TileGrid;
use super::intent::{Action, ActionSource};
use super::types::{Facing, Seconds};

/// Minimum horizontal speed to turn a duck into a slide.
pub const SLIDE_ENTRY_SPEED: f32 = 20.0;
/// A slide ends once horizontal speed drops under this.
pub const SLIDE_EXIT_SPEED: f32 = 30.0;
/// Share of normal drag applied while sliding.
const SLIDE_DRAG_SCALE: f32 = 0.2;
/// Top-speed multiplier while ducking on the ground.
const DUCK_SPEED_SCALE: f32 = 0.2;
/// Coasting speeds under this stop dead.
const DRAG_SNAP: f32 = 0.05;
const VELOCITY_SNAP: f32 = 0.001;

/// One full motion tick: input, then collision resolution.
pub fn step_player(player: &mut Player, input: &impl ActionSource, grid: &TileGrid, dt: f32) {
    apply_input(player, input, grid, dt);
    resolve_motion(&mut player.body, &mut player.status, grid, dt);
}

/// Turn this tick's actions into velocity and status changes.
pub fn apply_input(player: &mut Player, input: &impl ActionSource, grid: &TileGrid, dt: f32) {
    let left = input.is_down(Action::Left);
    let right = input.is_down(Action::Right);

    steer(player, left, right, dt);
    jump(player, input);
    dash(player, input, left, right, dt);
    crouch(player, input, grid, dt);

    if !player.status.grounded {
        player.body.vel.y += player.moves.gravity * dt;
    }

    let vel = &mut player.body.vel;
    if vel.x.abs() < VELOCITY_SNAP {
        vel.x = 0.0;
    }
    if vel.y.abs() < VELOCITY_SNAP {
        vel.y = 0.0;
    }
}

fn steer(player: &mut Player, left: bool, right: bool, dt: f32) {
    let moves = player.moves;
    let vel = &mut player.body.vel;
    let speed_mod = if player.status.ducking && player.status.grounded {
        DUCK_SPEED_SCALE
    } else {
        1.0
    };

    if player.status.sliding {
        vel.x *= 1.0 - moves.drag * SLIDE_DRAG_SCALE * dt;
    } else {
        if left {
            vel.x -= moves.accel * dt;
            player.facing = Facing::Left;
        }
        if right {
            vel.x += moves.accel * dt;
            player.facing = Facing::Right;
        }
        if !left && !right {
            if vel.x.abs() < DRAG_SNAP {
                vel.x = 0.0;
            } else {
                vel.x *= 1.0 - moves.drag * dt;
            }
        }
    }

    vel.x = vel.x.clamp(-moves.max_vel, moves.max_vel * speed_mod);
}

/// Grounded jump plus the early-release cut for variable height.
pub(crate) fn jump(player: &mut Player, input: &impl ActionSource) {
    let jump_force = player.moves.jump_force;
    let held = input.is_down(Action::Jump) || input.is_down(Action::Up);
    if held && player.status.grounded {
        player.body.vel.y = -jump_force;
        player.status.grounded = false;
        player.status.jumping = true;
    }

    let released = input.is_released(Action::Jump) || input.is_released(Action::Up);
    if released && player.body.vel.y < -jump_force * 0.5 {
        player.body.vel.y *= 0.5;
    }
}

fn dash(player: &mut Player, input: &impl ActionSource, left: bool, right: bool, dt: f32) {
    let moves = player.moves;
    if input.is_pressed(Action::Dash) && !player.status.dashing {
        player.status.dashing = true;
        player.dash_timer = Seconds::new(moves.dash_duration);

        let mut dir = player.facing.sign();
        if left {
            dir = -1.0;
        }
        if right {
            dir = 1.0;
        }
        player.body.vel.x = dir * moves.dash_speed;
    }

    if player.status.dashing {
        player.dash_timer = player.dash_timer.dec(dt);
        if player.dash_timer.is_expired() {
            player.status.dashing = false;
            player.body.vel.x = player.body.vel.x.clamp(-moves.max_vel, moves.max_vel);
        }
    }
}

/// Duck, slide, and the collision-checked stand-up.
fn crouch(player: &mut Player, input: &impl ActionSource, grid: &TileGrid, dt: f32) {
    let crouched_height = player.body.standing_height * player.moves.duck_scale;

    if input.is_down(Action::Down) {
        if player.status.grounded
            && !player.status.sliding
            && player.body.vel.x.abs() > SLIDE_ENTRY_SPEED
        {
            player.status.sliding = true;
            player.body.set_height(crouched_height);
            player.slide_timer = Seconds::new(player.moves.slide_duration);
        }
        if !player.status.sliding && !player.status.ducking {
            player.status.ducking = true;
            player.body.set_height(crouched_height);
        }
    } else {
        let standing = player.body.with_height(player.body.standing_height);
        if grid.overlaps_rect(standing.rect()) {
            player.status.ducking = true;
        } else {
            player.status.ducking = false;
            player.status.sliding = false;
            player.body = standing;
        }
    }

    if player.status.sliding {
        player.slide_timer = player.slide_timer.dec(dt);
        if player.slide_timer.is_expired() || player.body.vel.x.abs() < SLIDE_EXIT_SPEED {
            player.status.sliding = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tuning::Tuning;
    use crate::game::intent::ActionState;
    use bevy::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    /// Floor on the bottom row; a 64px-high gap under the overhang on row 2.
    fn level() -> TileGrid {
        TileGrid::from_ascii(
            "..........\n\
             ..........\n\
             .....#####\n\
             ..........\n\
             ##########",
        )
        .expect("grid")
    }

    /// Player resting on the floor row at x.
    fn grounded_player(x: f32) -> Player {
        let tuning = Tuning::default();
        Player::new(0, Vec2::new(x, 256.0 - tuning.movement.height), &tuning)
    }

    fn holding(actions: &[Action]) -> ActionState {
        let mut input = ActionState::default();
        for &a in actions {
            input.press(a);
        }
        input
    }

    #[test]
    fn jump_from_rest_sets_impulse() {
        let mut p = grounded_player(10.0);
        jump(&mut p, &holding(&[Action::Jump]));
        assert_eq!(p.body.vel.y, -p.moves.jump_force);
        assert!(!p.status.grounded);
        assert!(p.status.jumping);
    }

    #[test]
    fn jump_tick_leaves_floor() {
        let grid = level();
        let mut p = grounded_player(10.0);
        let start_y = p.body.pos.y;
        step_player(&mut p, &holding(&[Action::Up]), &grid, DT);
        let expected = -p.moves.jump_force + p.moves.gravity * DT;
        assert!((p.body.vel.y - expected).abs() < 1e-3);
        assert!(p.body.pos.y < start_y);
        assert!(!p.status.grounded);
        assert!(p.status.jumping);
    }

    #[test]
    fn early_release_halves_fast_ascent() {
        let mut p = grounded_player(10.0);
        p.status.grounded = false;
        p.body.vel.y = -900.0;
        let mut input = holding(&[Action::Jump]);
        input.clear_edges();
        input.release(Action::Jump);
        jump(&mut p, &input);
        assert_eq!(p.body.vel.y, -450.0);
    }

    #[test]
    fn coasting_snaps_to_zero() {
        let grid = level();
        let mut p = grounded_player(10.0);
        p.body.vel.x = 0.04;
        apply_input(&mut p, &ActionState::default(), &grid, DT);
        assert_eq!(p.body.vel.x, 0.0);
    }

    #[test]
    fn grounded_duck_caps_rightward_speed() {
        let grid = level();
        let mut p = grounded_player(10.0);
        p.status.ducking = true;
        p.body.vel.x = 100.0;
        apply_input(&mut p, &holding(&[Action::Right]), &grid, DT);
        assert_eq!(p.body.vel.x, p.moves.max_vel * DUCK_SPEED_SCALE);
    }

    #[test]
    fn down_while_running_starts_slide_with_bottom_fixed() {
        let grid = level();
        let mut p = grounded_player(10.0);
        p.body.vel.x = 250.0;
        let bottom = p.body.rect().max.y;
        apply_input(&mut p, &holding(&[Action::Down]), &grid, DT);
        assert!(p.status.sliding);
        assert!(!p.status.ducking);
        assert_eq!(p.body.size.y, p.body.standing_height * p.moves.duck_scale);
        assert_eq!(p.body.rect().max.y, bottom);
    }

    #[test]
    fn slide_ends_when_countdown_runs_out() {
        let grid = level();
        let mut p = grounded_player(10.0);
        p.body.vel.x = 250.0;
        let mut input = holding(&[Action::Down]);
        apply_input(&mut p, &input, &grid, DT);
        assert!(p.status.sliding);

        input.clear_edges();
        p.status.grounded = true;
        p.slide_timer = Seconds::new(DT * 0.5);
        apply_input(&mut p, &input, &grid, DT);
        assert!(p.body.vel.x > SLIDE_EXIT_SPEED);
        assert!(!p.status.sliding);
    }

    #[test]
    fn slide_ends_when_speed_drops() {
        let grid = level();
        let mut p = grounded_player(10.0);
        p.body.vel.x = 250.0;
        let mut input = holding(&[Action::Down]);
        apply_input(&mut p, &input, &grid, DT);
        assert!(p.status.sliding);

        input.clear_edges();
        p.status.grounded = true;
        p.body.vel.x = SLIDE_EXIT_SPEED;
        apply_input(&mut p, &input, &grid, DT);
        assert!(!p.slide_timer.is_expired());
        assert!(p.body.vel.x < SLIDE_EXIT_SPEED);
        assert!(!p.status.sliding);
    }

    #[test]
    fn dash_follows_held_direction_over_facing() {
        let mut p = grounded_player(10.0);
        assert_eq!(p.facing, Facing::Right);
        dash(&mut p, &holding(&[Action::Dash]), true, false, DT);
        assert_eq!(p.body.vel.x, -p.moves.dash_speed);

        let mut q = grounded_player(10.0);
        q.facing = Facing::Left;
        dash(&mut q, &holding(&[Action::Dash]), false, true, DT);
        assert_eq!(q.body.vel.x, q.moves.dash_speed);

        let mut r = grounded_player(10.0);
        r.facing = Facing::Left;
        dash(&mut r, &holding(&[Action::Dash]), false, false, DT);
        assert_eq!(r.body.vel.x, -r.moves.dash_speed);
    }

    #[test]
    fn standing_up_under_overhang_stays_ducked() {
        let grid = level();
        let mut p = grounded_player(10.0);
        apply_input(&mut p, &holding(&[Action::Down]), &grid, DT);
        assert!(p.status.ducking);

        // Crawl under the overhang, then let go of down.
        p.body.pos.x = 330.0;

        apply_input(&mut p, &ActionState::default(), &grid, DT);
        assert!(p.status.ducking);
        assert!(p.body.size.y < p.body.standing_height);

        // Out from under the overhang the stand-up succeeds.
        p.body.pos.x = 10.0;
        apply_input(&mut p, &ActionState::default(), &grid, DT);
        assert!(!p.status.ducking);
        assert_eq!(p.body.size.y, p.body.standing_height);
    }

    #[test]
    fn dash_fires_once_then_reclamps_on_expiry() {
        let grid = level();
        let mut p = grounded_player(10.0);
        let input = holding(&[Action::Dash]);
        apply_input(&mut p, &input, &grid, DT);
        assert!(p.status.dashing);
        assert_eq!(p.body.vel.x, p.moves.dash_speed);

        // Pressing again mid-dash does nothing.
        p.body.vel.x = 0.0;
        apply_input(&mut p, &input, &grid, DT);
        assert_eq!(p.body.vel.x, 0.0);

        p.body.vel.x = 5000.0;
        p.dash_timer = Seconds::new(DT * 0.5);
        apply_input(&mut p, &ActionState::default(), &grid, DT);
        assert!(!p.status.dashing);
        assert!(p.body.vel.x <= p.moves.max_vel);
    }

    #[test]
    fn resolved_player_never_overlaps_terrain() {
        let grid = level();
        let mut p = grounded_player(10.0);
        let mut input = ActionState::default();
        input.press(Action::Right);
        for tick in 0..240 {
            if tick % 40 == 0 {
                input.press(Action::Jump);
            } else {
                input.clear_edges();
                input.release(Action::Jump);
            }
            step_player(&mut p, &input, &grid, DT);
            assert!(!grid.overlaps_rect(p.body.rect()), "overlap at tick {tick}");
        }
    }
}
