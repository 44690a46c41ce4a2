use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::armory::{Armory, GunSpawner};
use super::combat::Projectiles;
use super::components::{sorted_roster, Player};
use super::events::{MatchCommand, MatchEvent};
use super::grenades::Grenades;
use super::grid::TileGrid;
use super::pickups::{Pickup, Pickups};
use super::spawn::find_spawn;
use super::types::{PlayerId, Seconds, SimRng};
use crate::config::tuning::Tuning;
use crate::storage::repo::MapLibrary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchPhase {
    #[default]
    RoundActive,
    RoundOver,
    MatchOver,
}

/// What the round-over countdown decided this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStep {
    Waiting,
    NextRound,
    MatchOver,
}

/// Round and match bookkeeping.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MatchInfo {
    pub total_rounds: u32,
    /// 1-based.
    pub current_round: u32,
    /// Round wins per player slot.
    pub wins: Vec<u32>,
    pub phase: MatchPhase,
    pub round_over_timer: Seconds,
    pub round_over_secs: f32,
    pub map_ids: Vec<String>,
}

impl MatchInfo {
    pub fn new(tuning: &Tuning, players: usize) -> Self {
        Self {
            total_rounds: tuning.total_rounds,
            current_round: 1,
            wins: vec![0; players],
            phase: MatchPhase::RoundActive,
            round_over_timer: Seconds::default(),
            round_over_secs: tuning.round_over_secs,
            map_ids: tuning.map_rotation.clone(),
        }
    }

    pub fn wins_needed(&self) -> u32 {
        self.total_rounds / 2 + 1
    }

    pub fn is_decided(&self) -> bool {
        let needed = self.wins_needed();
        self.wins.iter().any(|&w| w >= needed)
    }

    /// Map for the current round, cycling through the rotation.
    pub fn current_map(&self) -> Option<&str> {
        if self.map_ids.is_empty() {
            return None;
        }
        let index = (self.current_round.max(1) - 1) as usize % self.map_ids.len();
        Some(self.map_ids[index].as_str())
    }

    /// End the round once at most one player is left standing. The survivor,
    /// if any, is credited with the round.
    pub fn settle_round(&mut self, alive: &[PlayerId]) -> Option<MatchEvent> {
        if self.phase != MatchPhase::RoundActive || alive.len() > 1 {
            return None;
        }
        self.phase = MatchPhase::RoundOver;
        self.round_over_timer = Seconds::new(self.round_over_secs);

        let winner = alive.first().copied();
        if let Some(id) = winner {
            if self.wins.len() <= id {
                self.wins.resize(id + 1, 0);
            }
            self.wins[id] += 1;
        }
        Some(MatchEvent::RoundOver {
            round: self.current_round,
            winner,
        })
    }

    /// Run the round-over hold; on expiry advance to the next round or end the match.
    pub fn tick_round_over(&mut self, dt: f32) -> RoundStep {
        if self.phase != MatchPhase::RoundOver {
            return RoundStep::Waiting;
        }
        self.round_over_timer = self.round_over_timer.dec(dt);
        if !self.round_over_timer.is_expired() {
            return RoundStep::Waiting;
        }
        self.current_round += 1;
        if self.is_decided() {
            self.phase = MatchPhase::MatchOver;
            return RoundStep::MatchOver;
        }
        self.phase = MatchPhase::RoundActive;
        RoundStep::NextRound
    }

    /// Back to round one with a clean tally and the current match rules.
    pub fn restart(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning, self.wins.len());
    }
}

impl FromWorld for MatchInfo {
    fn from_world(world: &mut World) -> Self {
        let tuning = world.get_resource::<Tuning>().cloned().unwrap_or_default();
        Self::new(&tuning, 0)
    }
}

// ── Round setup ─────────────────────────────────────────────────────

/// Everything a round boundary rebuilds.
#[derive(SystemParam)]
pub struct RoundContext<'w, 's> {
    tuning: Res<'w, Tuning>,
    library: Res<'w, MapLibrary>,
    grid: ResMut<'w, TileGrid>,
    armory: ResMut<'w, Armory>,
    pickups: ResMut<'w, Pickups>,
    projectiles: ResMut<'w, Projectiles>,
    grenades: ResMut<'w, Grenades>,
    spawner: ResMut<'w, GunSpawner>,
    rng: ResMut<'w, SimRng>,
    players: Query<'w, 's, &'static mut Player>,
    events: MessageWriter<'w, MatchEvent>,
}

impl RoundContext<'_, '_> {
    /// Load the round's map, clear the world, and put every player back on a floor.
    pub fn start_round(&mut self, info: &MatchInfo) {
        let map_id = info.current_map().unwrap_or_default().to_string();
        if map_id.is_empty() {
            warn!("Map rotation is empty, round {} has no level", info.current_round);
        }
        *self.grid = self.library.load_or_empty(&map_id);

        self.armory.clear();
        self.pickups.0.clear();
        self.projectiles.0.clear();
        self.grenades.0.clear();
        self.spawner.reset();
        for &(x, y) in &self.tuning.grenade_pickup_spots {
            self.pickups
                .0
                .push(Pickup::grenades(Vec2::new(x, y), self.tuning.grenade_pickup_amount));
        }

        let size = Vec2::new(self.tuning.movement.width, self.tuning.movement.height);
        for player in sorted_roster(self.players.iter_mut()) {
            let spot = find_spawn(&self.grid, size, &mut self.rng.0);
            player.reset(spot, &self.tuning);
        }

        info!("Round {} started on {map_id:?}", info.current_round);
        self.events.write(MatchEvent::RoundStarted {
            round: info.current_round,
            map_id,
        });
    }

    fn alive_players(&self) -> Vec<PlayerId> {
        let mut alive: Vec<PlayerId> = self.players.iter().filter(|p| p.is_alive()).map(|p| p.id).collect();
        alive.sort_unstable();
        alive
    }
}

/// PostStartup: size the tally to the roster and start round one.
pub fn open_match(mut info: ResMut<MatchInfo>, mut ctx: RoundContext) {
    let players = ctx.players.iter().count();
    info.wins = vec![0; players];
    ctx.start_round(&info);
}

/// MatchSet: round/match transitions and the external restart.
pub fn advance_match(
    mut info: ResMut<MatchInfo>,
    mut commands: MessageReader<MatchCommand>,
    mut ctx: RoundContext,
) {
    let restart = commands
        .read()
        .filter(|c| **c == MatchCommand::Restart)
        .count()
        > 0;
    let dt = ctx.tuning.dt;

    match info.phase {
        MatchPhase::RoundActive => {
            let alive = ctx.alive_players();
            if let Some(event) = info.settle_round(&alive) {
                info!("Round {} over: {event:?}", info.current_round);
                ctx.events.write(event);
            }
        }
        MatchPhase::RoundOver => match info.tick_round_over(dt) {
            RoundStep::NextRound => ctx.start_round(&info),
            RoundStep::MatchOver => {
                info!("Match over, wins {:?}", info.wins);
                ctx.events.write(MatchEvent::MatchOver {
                    wins: info.wins.clone(),
                });
            }
            RoundStep::Waiting => {}
        },
        MatchPhase::MatchOver => {
            if restart {
                info!("Match restarted");
                info.restart(&ctx.tuning);
                ctx.start_round(&info);
            }
        }
    }
}
