//! Held-key input source
//!
//! Raw key-down/key-up events update a set of held codes; the frame loop
//! reads one snapshot per frame.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Game-level meaning of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Start,
}

/// Map a `KeyboardEvent.code` to a control
pub fn control_for(code: &str) -> Option<Control> {
    match code {
        "ArrowLeft" | "KeyA" => Some(Control::Left),
        "ArrowRight" | "KeyD" => Some(Control::Right),
        "Space" => Some(Control::Start),
        _ => None,
    }
}

/// Set of currently held key codes
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    held: HashSet<String>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press, returning its control if it has one
    pub fn key_down(&mut self, code: &str) -> Option<Control> {
        self.held.insert(code.to_owned());
        control_for(code)
    }

    /// Record a key release, returning its control if it has one
    pub fn key_up(&mut self, code: &str) -> Option<Control> {
        self.held.remove(code);
        control_for(code)
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    /// Forget everything (focus lost, restart)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    fn control_held(&self, control: Control) -> bool {
        self.held
            .iter()
            .any(|code| control_for(code) == Some(control))
    }

    /// Steering state for the coming frame
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            left: self.control_held(Control::Left),
            right: self.control_held(Control::Right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_mapping() {
        assert_eq!(control_for("ArrowLeft"), Some(Control::Left));
        assert_eq!(control_for("KeyA"), Some(Control::Left));
        assert_eq!(control_for("ArrowRight"), Some(Control::Right));
        assert_eq!(control_for("KeyD"), Some(Control::Right));
        assert_eq!(control_for("Space"), Some(Control::Start));
        assert_eq!(control_for("KeyW"), None);
    }

    #[test]
    fn test_snapshot_tracks_held_keys() {
        let mut keys = HeldKeys::new();
        assert_eq!(keys.snapshot(), TickInput::default());

        keys.key_down("KeyA");
        assert_eq!(keys.snapshot(), TickInput::LEFT);

        // Second left key; releasing one keeps steering left
        keys.key_down("ArrowLeft");
        keys.key_up("KeyA");
        assert_eq!(keys.snapshot(), TickInput::LEFT);

        keys.key_down("ArrowRight");
        assert_eq!(
            keys.snapshot(),
            TickInput {
                left: true,
                right: true
            }
        );

        keys.key_up("ArrowLeft");
        assert_eq!(keys.snapshot(), TickInput::RIGHT);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut keys = HeldKeys::new();
        keys.key_down("KeyD");
        let snap = keys.snapshot();
        keys.key_up("KeyD");
        assert!(snap.right);
        assert!(!keys.is_held("KeyD"));
    }

    #[test]
    fn test_unmapped_keys_do_not_steer() {
        let mut keys = HeldKeys::new();
        assert_eq!(keys.key_down("KeyQ"), None);
        assert!(keys.is_held("KeyQ"));
        assert_eq!(keys.snapshot(), TickInput::default());
        keys.clear();
        assert!(!keys.is_held("KeyQ"));
    }
}
