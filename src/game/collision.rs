use bevy::prelude::*;

use super::components::{Body, MovementStatus};
use super::grid::TileGrid;

/// Below this squared distance a circle centre sits on the box edge and has no usable normal.
const CONTACT_EPSILON_SQ: f32 = 0.0001;

/// Move a body by `vel * dt`, horizontal axis first, then vertical.
///
/// A blocked axis is reverted and its velocity zeroed. Landing on something
/// sets Grounded and clears Jumping; an unblocked vertical move clears Grounded.
pub fn resolve_motion(body: &mut Body, status: &mut MovementStatus, grid: &TileGrid, dt: f32) {
    let move_x = body.vel.x * dt;
    body.pos.x += move_x;
    if grid.overlaps_rect(body.rect()) {
        body.pos.x -= move_x;
        body.vel.x = 0.0;
    }

    let move_y = body.vel.y * dt;
    body.pos.y += move_y;
    if grid.overlaps_rect(body.rect()) {
        body.pos.y -= move_y;
        if move_y > 0.0 {
            body.vel.y = 0.0;
            status.grounded = true;
            status.jumping = false;
        } else if move_y < 0.0 {
            body.vel.y = 0.0;
        }
    } else {
        status.grounded = false;
    }
}

/// Penetration of a circle into a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the box surface toward the circle centre.
    pub normal: Vec2,
    pub depth: f32,
}

/// Closest-point circle/box contact, `None` when apart or when the centre is
/// exactly on the surface.
pub fn circle_rect_contact(center: Vec2, radius: f32, rect: Rect) -> Option<Contact> {
    let closest = center.clamp(rect.min, rect.max);
    let offset = center - closest;
    let dist_sq = offset.length_squared();
    if dist_sq >= radius * radius || dist_sq <= CONTACT_EPSILON_SQ {
        return None;
    }
    let dist = dist_sq.sqrt();
    Some(Contact {
        normal: offset / dist,
        depth: radius - dist,
    })
}
