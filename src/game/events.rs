use bevy::prelude::*;

use super::types::{PlayerId, Shooter};

/// Round and match lifecycle, consumed by whatever draws the overlays.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum MatchEvent {
    RoundStarted { round: u32, map_id: String },
    /// `winner` is `None` on a double knockout.
    RoundOver { round: u32, winner: Option<PlayerId> },
    MatchOver { wins: Vec<u32> },
}

/// Damage and death notifications from a simulation tick.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum CombatEvent {
    PlayerHit {
        victim: PlayerId,
        shooter: Shooter,
        health: i32,
    },
    PlayerKilled {
        victim: PlayerId,
        /// Credited player; `None` for environment fragments.
        killer: Option<PlayerId>,
    },
    FellOut {
        victim: PlayerId,
    },
    GrenadeExploded {
        at: Vec2,
        fragments: usize,
    },
}

/// External requests into the match state machine.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCommand {
    Restart,
}
