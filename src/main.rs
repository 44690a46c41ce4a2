use bevy::prelude::*;

use tile_brawl::config::tuning::Tuning;
use tile_brawl::game::components::Player;
use tile_brawl::game::events::{CombatEvent, MatchEvent};
use tile_brawl::game::intent::{ActionState, ControlSet};
use tile_brawl::plugins::{controls_plugin::ControlsPlugin, simulation_plugin::SimulationPlugin};

fn main() {
    let tuning = Tuning::load_or_default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Tile Brawl".into(),
                resolution: (1280u32, 768u32).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(Time::<Fixed>::from_seconds(tuning.dt as f64))
        .insert_resource(tuning)
        .add_plugins((SimulationPlugin, ControlsPlugin))
        .add_systems(Startup, setup_match)
        .add_systems(Update, log_match_events)
        .run();
}

/// Camera plus one keyboard player and one gamepad player. The match opens
/// in PostStartup and places them.
fn setup_match(mut commands: Commands, tuning: Res<Tuning>) {
    commands.spawn(Camera2d);

    let controls = [ControlSet::keyboard(), ControlSet::gamepad(0)];
    for (id, control) in controls.into_iter().enumerate() {
        commands.spawn((
            Player::new(id, Vec2::ZERO, &tuning),
            control,
            ActionState::default(),
        ));
    }
}

fn log_match_events(mut matches: MessageReader<MatchEvent>, mut combat: MessageReader<CombatEvent>) {
    for event in matches.read() {
        match event {
            MatchEvent::RoundStarted { round, map_id } => info!("Round {round} on {map_id}"),
            MatchEvent::RoundOver { round, winner: Some(id) } => info!("Player {id} wins round {round}"),
            MatchEvent::RoundOver { round, winner: None } => info!("Round {round} is a draw"),
            MatchEvent::MatchOver { wins } => info!("Final tally {wins:?}, press R to restart"),
        }
    }
    for event in combat.read() {
        debug!("{event:?}");
    }
}
