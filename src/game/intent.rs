use bevy::prelude::*;

/// The nine logical controls every player has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Dash,
    Fire,
    Grenade,
    Interact,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Jump,
        Action::Dash,
        Action::Fire,
        Action::Grenade,
        Action::Interact,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Boolean action queries. The simulation reads input only through this.
pub trait ActionSource {
    fn is_down(&self, action: Action) -> bool;
    fn is_pressed(&self, action: Action) -> bool;
    fn is_released(&self, action: Action) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ButtonState {
    down: bool,
    pressed: bool,
    released: bool,
}

/// Input intent: written in Update, consumed in FixedUpdate.
///
/// Edges are latched until [`ActionState::clear_edges`] runs at the end of a
/// simulation tick, so a press between two fixed steps is still seen.
#[derive(Component, Debug, Clone, Default)]
pub struct ActionState {
    buttons: [ButtonState; 9],
}

impl ActionState {
    /// Record the current level of a control, deriving press/release edges.
    pub fn set_down(&mut self, action: Action, down: bool) {
        let button = &mut self.buttons[action.index()];
        if down && !button.down {
            button.pressed = true;
        }
        if !down && button.down {
            button.released = true;
        }
        button.down = down;
    }

    pub fn press(&mut self, action: Action) {
        self.set_down(action, true);
    }

    pub fn release(&mut self, action: Action) {
        self.set_down(action, false);
    }

    pub fn clear_edges(&mut self) {
        for button in &mut self.buttons {
            button.pressed = false;
            button.released = false;
        }
    }
}

impl ActionSource for ActionState {
    fn is_down(&self, action: Action) -> bool {
        self.buttons[action.index()].down
    }

    fn is_pressed(&self, action: Action) -> bool {
        self.buttons[action.index()].pressed
    }

    fn is_released(&self, action: Action) -> bool {
        self.buttons[action.index()].released
    }
}

// ── Device bindings ─────────────────────────────────────────────────

/// One device code per logical action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings<T> {
    pub left: T,
    pub right: T,
    pub up: T,
    pub down: T,
    pub jump: T,
    pub dash: T,
    pub fire: T,
    pub grenade: T,
    pub interact: T,
}

impl<T: Copy> Bindings<T> {
    pub fn code(&self, action: Action) -> T {
        match action {
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Up => self.up,
            Action::Down => self.down,
            Action::Jump => self.jump,
            Action::Dash => self.dash,
            Action::Fire => self.fire,
            Action::Grenade => self.grenade,
            Action::Interact => self.interact,
        }
    }
}

impl Default for Bindings<KeyCode> {
    fn default() -> Self {
        Self {
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            up: KeyCode::KeyW,
            down: KeyCode::KeyS,
            jump: KeyCode::Space,
            dash: KeyCode::ShiftLeft,
            fire: KeyCode::KeyJ,
            grenade: KeyCode::KeyK,
            interact: KeyCode::KeyE,
        }
    }
}

impl Default for Bindings<GamepadButton> {
    fn default() -> Self {
        Self {
            left: GamepadButton::DPadLeft,
            right: GamepadButton::DPadRight,
            up: GamepadButton::DPadUp,
            down: GamepadButton::DPadDown,
            jump: GamepadButton::South,
            dash: GamepadButton::East,
            fire: GamepadButton::RightTrigger,
            grenade: GamepadButton::RightTrigger2,
            interact: GamepadButton::LeftTrigger2,
        }
    }
}

/// Which device drives a player, and how its buttons map to actions.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum ControlSet {
    Keyboard(Bindings<KeyCode>),
    Gamepad {
        /// Position among connected gamepads.
        index: usize,
        bindings: Bindings<GamepadButton>,
    },
}

impl ControlSet {
    pub fn keyboard() -> Self {
        Self::Keyboard(Bindings::default())
    }

    pub fn gamepad(index: usize) -> Self {
        Self::Gamepad {
            index,
            bindings: Bindings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_then_hold_reports_edge_once() {
        let mut state = ActionState::default();
        state.press(Action::Jump);
        assert!(state.is_down(Action::Jump));
        assert!(state.is_pressed(Action::Jump));

        state.clear_edges();
        state.set_down(Action::Jump, true);
        assert!(state.is_down(Action::Jump));
        assert!(!state.is_pressed(Action::Jump));
    }

    #[test]
    fn tap_between_ticks_is_latched() {
        let mut state = ActionState::default();
        state.press(Action::Dash);
        state.release(Action::Dash);
        assert!(!state.is_down(Action::Dash));
        assert!(state.is_pressed(Action::Dash));
        assert!(state.is_released(Action::Dash));
        state.clear_edges();
        assert!(!state.is_pressed(Action::Dash));
        assert!(!state.is_released(Action::Dash));
    }

    #[test]
    fn default_keyboard_layout() {
        let ControlSet::Keyboard(keys) = ControlSet::keyboard() else {
            panic!("expected keyboard");
        };
        assert_eq!(keys.code(Action::Jump), KeyCode::Space);
        assert_eq!(keys.code(Action::Interact), KeyCode::KeyE);
    }
}
