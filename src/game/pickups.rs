use bevy::prelude::*;
use rand::Rng;

use super::armory::{Armory, Gun, GunHandle};
use super::components::Player;
use super::grid::TileGrid;
use super::intent::{Action, ActionSource};
use super::spawn::find_free_spot;
use super::types::rects_overlap;
use crate::config::tuning::GunSpec;

/// Footprint of a grenade refill.
pub const GRENADE_PICKUP_SIZE: Vec2 = Vec2::new(20.0, 20.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Gun(GunHandle),
    Grenades { amount: u32 },
}

/// Something a player can collect. Never removed, only deactivated.
#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub center: Vec2,
    pub size: Vec2,
    pub kind: PickupKind,
    pub active: bool,
}

impl Pickup {
    pub fn gun(handle: GunHandle, center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size,
            kind: PickupKind::Gun(handle),
            active: true,
        }
    }

    pub fn grenades(center: Vec2, amount: u32) -> Self {
        Self {
            center,
            size: GRENADE_PICKUP_SIZE,
            kind: PickupKind::Grenades { amount },
            active: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, self.size)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Pickups(pub Vec<Pickup>);

/// What an interaction changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    TookGun { gun: GunHandle, dropped: Option<GunHandle> },
    Refilled { grenades: u32 },
}

/// Refresh the player's nearby pickup, auto-collect grenades, and take a gun
/// on an interact press.
pub fn resolve_pickups(
    player: &mut Player,
    input: &impl ActionSource,
    pickups: &mut Vec<Pickup>,
    armory: &mut Armory,
) -> Option<Interaction> {
    player.nearby_pickup = None;
    let rect = player.body.rect();
    let Some(index) = pickups
        .iter()
        .position(|p| p.active && rects_overlap(rect, p.rect()))
    else {
        return None;
    };
    player.nearby_pickup = Some(index);

    if matches!(pickups[index].kind, PickupKind::Grenades { .. }) {
        return interact(player, pickups, armory);
    }
    if input.is_pressed(Action::Interact) && player.can_interact() {
        return interact(player, pickups, armory);
    }
    None
}

/// Act on the pickup the player is standing at. Interaction state is reset
/// afterwards whatever the outcome.
pub fn interact(player: &mut Player, pickups: &mut Vec<Pickup>, armory: &mut Armory) -> Option<Interaction> {
    let index = player.nearby_pickup.take()?;
    let kind = pickups.get(index).filter(|p| p.active)?.kind;

    match kind {
        PickupKind::Gun(handle) => {
            if !armory.contains(handle) {
                return None;
            }
            let dropped = player.gun.take().and_then(|held| drop_gun(held, player, pickups, armory));
            if let Some(gun) = armory.get_mut(handle) {
                gun.picked_up = true;
            }
            player.gun = Some(handle);
            pickups[index].active = false;
            Some(Interaction::TookGun { gun: handle, dropped })
        }
        PickupKind::Grenades { amount } => {
            if player.grenades >= player.max_grenades {
                return None;
            }
            player.grenades = (player.grenades + amount).min(player.max_grenades);
            pickups[index].active = false;
            Some(Interaction::Refilled {
                grenades: player.grenades,
            })
        }
    }
}

/// Put a held gun back in the world at the player's centre.
fn drop_gun(held: GunHandle, player: &Player, pickups: &mut Vec<Pickup>, armory: &mut Armory) -> Option<GunHandle> {
    let gun = armory.get_mut(held)?;
    let center = player.body.center();
    gun.picked_up = false;
    gun.pos = center - gun.size * 0.5;
    pickups.push(Pickup::gun(held, center, gun.size));
    Some(held)
}

/// Place a fresh gun at a random free spot and add its pickup.
pub fn spawn_gun(
    spec: &GunSpec,
    grid: &TileGrid,
    armory: &mut Armory,
    pickups: &mut Vec<Pickup>,
    rng: &mut impl Rng,
) -> Option<GunHandle> {
    let size = Vec2::new(spec.width, spec.height);
    let Some(pos) = find_free_spot(grid, size, rng) else {
        warn!("No free spot for a gun on this map, skipping spawn");
        return None;
    };
    let gun = Gun::from_spec(spec, pos);
    let center = gun.center();
    let handle = armory.insert(gun);
    pickups.push(Pickup::gun(handle, center, size));
    Some(handle)
}
