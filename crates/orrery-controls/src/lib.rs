//! Live user-adjustable parameters and the bridge that carries them.
//!
//! A control surface publishes whole [`Controls`] values; the animation driver
//! takes one immutable snapshot per frame. Outbound notifications (camera
//! distance changes, picked bodies) flow back over a channel.

mod bridge;
mod command;
mod controls;

pub use bridge::{BridgeEvent, ControlBridge};
pub use command::ControlCommand;
pub use controls::{BodyOverride, Controls, EffectMode, ParseEffectModeError};
