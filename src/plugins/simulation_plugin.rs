use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::game::{
    armory::{Armory, GunSpawner},
    combat::Projectiles,
    events::{CombatEvent, MatchCommand, MatchEvent},
    grenades::Grenades,
    grid::TileGrid,
    pickups::Pickups,
    rounds::{self, MatchInfo},
    tick,
    types::SimRng,
};
use crate::storage::repo::MapLibrary;

// ── SystemSets (strict FixedUpdate ordering) ────────────────────────

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSet {
    PlayerSet,
    ProjectileSet,
    GrenadeSet,
    WorldSet,
    MatchSet,
    CleanupSet,
}

/// The simulation core: one tick per fixed step, no rendering.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<MatchEvent>();
        app.add_message::<CombatEvent>();
        app.add_message::<MatchCommand>();

        app.init_resource::<Tuning>()
            .init_resource::<MapLibrary>()
            .init_resource::<TileGrid>()
            .init_resource::<Armory>()
            .init_resource::<GunSpawner>()
            .init_resource::<Pickups>()
            .init_resource::<Projectiles>()
            .init_resource::<Grenades>()
            .init_resource::<SimRng>()
            .init_resource::<MatchInfo>();

        app.configure_sets(
            FixedUpdate,
            (
                SimSet::PlayerSet,
                SimSet::ProjectileSet,
                SimSet::GrenadeSet,
                SimSet::WorldSet,
                SimSet::MatchSet,
                SimSet::CleanupSet,
            )
                .chain(),
        );

        app.add_systems(FixedUpdate, tick::run_players.in_set(SimSet::PlayerSet));
        app.add_systems(FixedUpdate, tick::run_projectiles.in_set(SimSet::ProjectileSet));
        app.add_systems(FixedUpdate, tick::run_grenades.in_set(SimSet::GrenadeSet));
        app.add_systems(FixedUpdate, tick::run_world.in_set(SimSet::WorldSet));
        app.add_systems(FixedUpdate, rounds::advance_match.in_set(SimSet::MatchSet));
        app.add_systems(FixedUpdate, tick::clear_action_edges.in_set(SimSet::CleanupSet));

        // Players are spawned by the host in Startup; the match opens after.
        app.add_systems(PostStartup, rounds::open_match);
    }
}
