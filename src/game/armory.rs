use bevy::prelude::*;

use super::types::{rect_at, Seconds};
use crate::config::tuning::GunSpec;

/// A gun lying in the world or held by a player.
#[derive(Debug, Clone, PartialEq)]
pub struct Gun {
    /// Top-left corner while lying in the world; last drop point once held.
    pub pos: Vec2,
    pub size: Vec2,
    pub ammo: u32,
    pub fire_rate: f32,
    pub projectile_speed: f32,
    pub spread: f32,
    pub range: f32,
    pub cooldown: Seconds,
    pub picked_up: bool,
}

impl Gun {
    pub fn from_spec(spec: &GunSpec, pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(spec.width, spec.height),
            ammo: spec.ammo,
            fire_rate: spec.fire_rate,
            projectile_speed: spec.projectile_speed,
            spread: spec.spread,
            range: spec.range,
            cooldown: Seconds::default(),
            picked_up: false,
        }
    }

    pub fn rect(&self) -> Rect {
        rect_at(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Stable reference to a gun slot. Survives armory growth; goes stale when
/// the slot is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GunHandle {
    index: usize,
    generation: u32,
}

impl GunHandle {
    pub fn index(self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    gun: Option<Gun>,
}

/// Every gun in the current round, addressed by [`GunHandle`].
#[derive(Resource, Debug, Clone, Default)]
pub struct Armory {
    slots: Vec<Slot>,
}

impl Armory {
    pub fn insert(&mut self, gun: Gun) -> GunHandle {
        if let Some(index) = self.slots.iter().position(|s| s.gun.is_none()) {
            let slot = &mut self.slots[index];
            slot.gun = Some(gun);
            return GunHandle {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            gun: Some(gun),
        });
        GunHandle {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    pub fn get(&self, handle: GunHandle) -> Option<&Gun> {
        self.slots
            .get(handle.index)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.gun.as_ref())
    }

    pub fn get_mut(&mut self, handle: GunHandle) -> Option<&mut Gun> {
        self.slots
            .get_mut(handle.index)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.gun.as_mut())
    }

    pub fn contains(&self, handle: GunHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.gun.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every gun. Outstanding handles become stale.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.gun = None;
            slot.generation = slot.generation.wrapping_add(1);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (GunHandle, &Gun)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.gun.as_ref().map(|gun| {
                (
                    GunHandle {
                        index,
                        generation: slot.generation,
                    },
                    gun,
                )
            })
        })
    }
}

/// Countdown to the next gun drop.
#[derive(Resource, Debug, Clone, Default)]
pub struct GunSpawner {
    pub timer: Seconds,
}

impl GunSpawner {
    /// Advance by dt; true when a gun is due (the timer then restarts).
    pub fn tick(&mut self, dt: f32, interval: f32) -> bool {
        self.timer = self.timer.dec(dt);
        if self.timer.is_expired() {
            self.timer = Seconds::new(interval);
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.timer = Seconds::default();
    }
}
