use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::game::{
    events::MatchCommand,
    intent::{Action, ActionState, ControlSet},
    rounds::{MatchInfo, MatchPhase},
};

/// Polls keyboard and gamepads into each player's [`ActionState`].
pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (capture_actions, restart_input, tuning_reload_input),
        );
    }
}

fn capture_actions(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<(Entity, &Gamepad)>,
    mut players: Query<(&ControlSet, &mut ActionState)>,
) {
    let pads = in_entity_order(gamepads.iter().collect());
    for (controls, mut state) in &mut players {
        match controls {
            ControlSet::Keyboard(keys) => {
                for action in Action::ALL {
                    state.set_down(action, keyboard.pressed(keys.code(action)));
                }
            }
            ControlSet::Gamepad { index, bindings } => {
                let pad = pads.get(*index);
                for action in Action::ALL {
                    let down = pad.is_some_and(|p| p.pressed(bindings.code(action)));
                    state.set_down(action, down);
                }
            }
        }
    }
}

/// Devices sorted by entity, so a slot index keeps naming the same pad
/// whatever order the query yields them in.
fn in_entity_order<T>(mut pads: Vec<(Entity, T)>) -> Vec<T> {
    pads.sort_by_key(|(entity, _)| *entity);
    pads.into_iter().map(|(_, pad)| pad).collect()
}

/// R (or Start on any pad) restarts a finished match.
fn restart_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    info: Res<MatchInfo>,
    mut commands: MessageWriter<MatchCommand>,
) {
    if info.phase != MatchPhase::MatchOver {
        return;
    }
    let pad_start = gamepads.iter().any(|p| p.just_pressed(GamepadButton::Start));
    if keyboard.just_pressed(KeyCode::KeyR) || pad_start {
        commands.write(MatchCommand::Restart);
    }
}

fn tuning_reload_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut tuning: ResMut<Tuning>,
    mut fixed: ResMut<Time<Fixed>>,
) {
    if keyboard.just_pressed(KeyCode::F5) {
        tuning.reload();
        fixed.set_timestep_seconds(tuning.dt as f64);
    }
}
