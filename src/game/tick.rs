use bevy::prelude::*;

use super::armory::{Armory, GunSpawner};
use super::combat::{advance_projectiles, try_fire, Projectiles, Shot};
use super::components::{sorted_roster, Player};
use super::events::CombatEvent;
use super::grenades::{advance_grenades, try_throw, Grenades};
use super::grid::TileGrid;
use super::intent::ActionState;
use super::lifecycle::{check_fall_out, tick_timers};
use super::movement::step_player;
use super::pickups::{resolve_pickups, spawn_gun, Pickups};
use super::rounds::{MatchInfo, MatchPhase};
use super::spawn::find_spawn;
use super::types::SimRng;
use crate::config::tuning::Tuning;

/// PlayerSet: motion, collision, pickups, shooting and throwing, one live
/// player at a time in slot order.
#[allow(clippy::too_many_arguments)]
pub fn run_players(
    tuning: Res<Tuning>,
    grid: Res<TileGrid>,
    mut armory: ResMut<Armory>,
    mut pickups: ResMut<Pickups>,
    mut projectiles: ResMut<Projectiles>,
    mut grenades: ResMut<Grenades>,
    mut rng: ResMut<SimRng>,
    mut players: Query<(&mut Player, &ActionState)>,
) {
    let dt = tuning.dt;
    let mut roster: Vec<(&mut Player, &ActionState)> = players
        .iter_mut()
        .map(|(player, input)| (player.into_inner(), input))
        .collect();
    roster.sort_by_key(|(player, _)| player.id);

    for (player, input) in roster {
        if !player.is_alive() {
            continue;
        }
        step_player(player, input, &grid, dt);

        if let Some(interaction) = resolve_pickups(player, input, &mut pickups.0, &mut armory) {
            debug!("Player {} picked up: {interaction:?}", player.id);
        }

        match try_fire(player, input, &mut armory, &mut rng.0, dt) {
            Some(Shot::Fired(projectile)) => projectiles.0.push(projectile),
            Some(Shot::Dropped(_)) => debug!("Player {} dropped an empty gun", player.id),
            None => {}
        }

        if let Some(grenade) = try_throw(player, input, &tuning.grenade) {
            grenades.0.push(grenade);
        }
    }
}

/// ProjectileSet: bullets and fragments travel and hit.
pub fn run_projectiles(
    tuning: Res<Tuning>,
    grid: Res<TileGrid>,
    mut projectiles: ResMut<Projectiles>,
    mut players: Query<&mut Player>,
    mut combat_events: MessageWriter<CombatEvent>,
) {
    let mut roster = sorted_roster(players.iter_mut());
    let events = advance_projectiles(&mut projectiles.0, &mut roster, &grid, &tuning, tuning.dt);
    combat_events.write_batch(events);
}

/// GrenadeSet: flight, bounces, kicks and detonation.
pub fn run_grenades(
    tuning: Res<Tuning>,
    grid: Res<TileGrid>,
    mut grenades: ResMut<Grenades>,
    mut projectiles: ResMut<Projectiles>,
    mut rng: ResMut<SimRng>,
    players: Query<&Player>,
    mut combat_events: MessageWriter<CombatEvent>,
) {
    let mut roster: Vec<&Player> = players.iter().collect();
    roster.sort_by_key(|p| p.id);
    let events = advance_grenades(
        &mut grenades.0,
        &mut projectiles.0,
        &roster,
        &grid,
        &tuning.grenade,
        &mut rng.0,
        tuning.dt,
    );
    combat_events.write_batch(events);
}

/// WorldSet: timers, respawns, fall-out and the gun spawner.
#[allow(clippy::too_many_arguments)]
pub fn run_world(
    tuning: Res<Tuning>,
    grid: Res<TileGrid>,
    info: Res<MatchInfo>,
    mut armory: ResMut<Armory>,
    mut pickups: ResMut<Pickups>,
    mut spawner: ResMut<GunSpawner>,
    mut rng: ResMut<SimRng>,
    mut players: Query<&mut Player>,
    mut combat_events: MessageWriter<CombatEvent>,
) {
    let dt = tuning.dt;
    let mut roster = sorted_roster(players.iter_mut());

    let ready = tick_timers(&mut roster, dt);
    if info.phase == MatchPhase::RoundActive {
        for player in roster.iter_mut().filter(|p| ready.contains(&p.id)) {
            let size = Vec2::new(tuning.movement.width, tuning.movement.height);
            let spot = find_spawn(&grid, size, &mut rng.0);
            player.reset(spot, &tuning);
            info!("Player {} respawned at {spot:?}", player.id);
        }
    }

    let events = check_fall_out(&mut roster, &grid, tuning.fall_out_margin);
    combat_events.write_batch(events);

    if spawner.tick(dt, tuning.gun_spawn_interval) {
        spawn_gun(&tuning.gun, &grid, &mut armory, &mut pickups.0, &mut rng.0);
    }
}

/// CleanupSet: input edges are consumed once per tick.
pub fn clear_action_edges(mut inputs: Query<&mut ActionState>) {
    for mut input in &mut inputs {
        input.clear_edges();
    }
}
