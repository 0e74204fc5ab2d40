//! Discrete edits a control surface can make.

use crate::controls::{Controls, EffectMode};

/// Slider range of the global time speed.
pub const TIME_SPEED_RANGE: (f32, f32) = (0.1, 5.0);
/// Slider range of the global rotation speed.
pub const ROTATION_SPEED_RANGE: (f32, f32) = (0.0, 5.0);
/// Slider range of the uniform scale.
pub const SCALE_RANGE: (f32, f32) = (0.5, 3.0);

/// One user action against [`Controls`].
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    TogglePlaying,
    SetEffect(EffectMode),
    ToggleOrbits,
    ToggleStars,
    ToggleWireframe,
    ToggleAutoRotate,
    /// Multiply the time speed, clamped to the slider range.
    ScaleTimeSpeed(f32),
    /// Add to the rotation speed, clamped to the slider range.
    AdjustRotationSpeed(f32),
    /// Add to the uniform scale, clamped to the slider range.
    AdjustScale(f32),
    ToggleBody(String),
    ResetPlayback,
}

impl Controls {
    /// Apply a command. Returns false when it changed nothing.
    pub fn apply(&mut self, command: &ControlCommand) -> bool {
        let before = self.clone();
        match command {
            ControlCommand::TogglePlaying => self.playing = !self.playing,
            ControlCommand::SetEffect(mode) => self.effect = *mode,
            ControlCommand::ToggleOrbits => self.show_orbits = !self.show_orbits,
            ControlCommand::ToggleStars => self.show_stars = !self.show_stars,
            ControlCommand::ToggleWireframe => self.wireframe = !self.wireframe,
            ControlCommand::ToggleAutoRotate => self.auto_rotate = !self.auto_rotate,
            ControlCommand::ScaleTimeSpeed(factor) => {
                self.time_speed =
                    (self.time_speed * factor).clamp(TIME_SPEED_RANGE.0, TIME_SPEED_RANGE.1);
            }
            ControlCommand::AdjustRotationSpeed(delta) => {
                self.rotation_speed = (self.rotation_speed + delta)
                    .clamp(ROTATION_SPEED_RANGE.0, ROTATION_SPEED_RANGE.1);
            }
            ControlCommand::AdjustScale(delta) => {
                self.scale = (self.scale + delta).clamp(SCALE_RANGE.0, SCALE_RANGE.1);
            }
            ControlCommand::ToggleBody(name) => {
                let body = self.body_mut(name);
                body.visible = !body.visible;
            }
            ControlCommand::ResetPlayback => self.reset_playback(),
        }
        *self != before
    }
}
