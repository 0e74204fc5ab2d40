//! Keyboard stand-in for the control surface.

use orrery_controls::{ControlCommand, EffectMode};
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Multiplier applied by `+` and divided out by `-`.
pub const TIME_SPEED_STEP: f32 = 1.5;
pub const ROTATION_SPEED_STEP: f32 = 0.25;
pub const SCALE_STEP: f32 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Control(ControlCommand),
    ReloadConfig,
}

const FUNCTION_KEYS: [NamedKey; 8] = [
    NamedKey::F1,
    NamedKey::F2,
    NamedKey::F3,
    NamedKey::F4,
    NamedKey::F5,
    NamedKey::F6,
    NamedKey::F7,
    NamedKey::F8,
];

/// Map a key press to an action. `bodies` are catalog names in order; F1
/// toggles the first.
pub fn action_for(key: &Key, modifiers: ModifiersState, bodies: &[String]) -> Option<KeyAction> {
    let command = match key {
        Key::Named(NamedKey::Space) => ControlCommand::TogglePlaying,
        Key::Named(named) => {
            let index = FUNCTION_KEYS.iter().position(|f| f == named)?;
            ControlCommand::ToggleBody(bodies.get(index)?.clone())
        }
        Key::Character(text) => match text.to_lowercase().as_str() {
            "r" if modifiers.control_key() => return Some(KeyAction::ReloadConfig),
            "r" => ControlCommand::ResetPlayback,
            digit @ ("1" | "2" | "3" | "4") => {
                let index = digit.parse::<usize>().ok()? - 1;
                ControlCommand::SetEffect(EffectMode::ALL[index])
            }
            "o" => ControlCommand::ToggleOrbits,
            "s" => ControlCommand::ToggleStars,
            "w" => ControlCommand::ToggleWireframe,
            "a" => ControlCommand::ToggleAutoRotate,
            "+" | "=" => ControlCommand::ScaleTimeSpeed(TIME_SPEED_STEP),
            "-" => ControlCommand::ScaleTimeSpeed(TIME_SPEED_STEP.recip()),
            "]" => ControlCommand::AdjustRotationSpeed(ROTATION_SPEED_STEP),
            "[" => ControlCommand::AdjustRotationSpeed(-ROTATION_SPEED_STEP),
            "." => ControlCommand::AdjustScale(SCALE_STEP),
            "," => ControlCommand::AdjustScale(-SCALE_STEP),
            _ => return None,
        },
        _ => return None,
    };
    Some(KeyAction::Control(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies() -> Vec<String> {
        ["Mercury", "Venus", "Earth"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn press(text: &str) -> Option<KeyAction> {
        action_for(
            &Key::Character(text.into()),
            ModifiersState::empty(),
            &bodies(),
        )
    }

    #[test]
    fn test_space_toggles_playing() {
        let action = action_for(
            &Key::Named(NamedKey::Space),
            ModifiersState::empty(),
            &bodies(),
        );
        assert_eq!(
            action,
            Some(KeyAction::Control(ControlCommand::TogglePlaying))
        );
    }

    #[test]
    fn test_digits_select_effects_in_order() {
        assert_eq!(
            press("1"),
            Some(KeyAction::Control(ControlCommand::SetEffect(
                EffectMode::Orbit
            )))
        );
        assert_eq!(
            press("4"),
            Some(KeyAction::Control(ControlCommand::SetEffect(
                EffectMode::Debris
            )))
        );
        assert_eq!(press("5"), None);
    }

    #[test]
    fn test_ctrl_r_reloads_and_plain_r_resets() {
        let reload = action_for(
            &Key::Character("r".into()),
            ModifiersState::CONTROL,
            &bodies(),
        );
        assert_eq!(reload, Some(KeyAction::ReloadConfig));
        assert_eq!(
            press("R"),
            Some(KeyAction::Control(ControlCommand::ResetPlayback))
        );
    }

    #[test]
    fn test_function_keys_toggle_bodies_by_position() {
        let f2 = action_for(
            &Key::Named(NamedKey::F2),
            ModifiersState::empty(),
            &bodies(),
        );
        assert_eq!(
            f2,
            Some(KeyAction::Control(ControlCommand::ToggleBody(
                "Venus".to_string()
            )))
        );
        // Only three bodies in this catalog.
        let f5 = action_for(
            &Key::Named(NamedKey::F5),
            ModifiersState::empty(),
            &bodies(),
        );
        assert_eq!(f5, None);
    }

    #[test]
    fn test_speed_keys_are_inverse() {
        let Some(KeyAction::Control(ControlCommand::ScaleTimeSpeed(up))) = press("+") else {
            panic!("expected time speed command");
        };
        let Some(KeyAction::Control(ControlCommand::ScaleTimeSpeed(down))) = press("-") else {
            panic!("expected time speed command");
        };
        assert!((up * down - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unbound_keys_do_nothing() {
        assert_eq!(press("q"), None);
        let escape = action_for(
            &Key::Named(NamedKey::Escape),
            ModifiersState::empty(),
            &bodies(),
        );
        assert_eq!(escape, None);
    }
}
