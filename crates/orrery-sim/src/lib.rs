//! Animation loop for the orrery.
//!
//! [`AnimationDriver`] advances orbital and spin angles, runs the active visual
//! effect and applies presentation toggles from a per-frame controls snapshot.
//! [`Session`] owns one mounted simulation and routes pointer input, resize and
//! teardown to it.

mod clock;
mod driver;
mod error;
mod session;

pub use clock::{FrameClock, FrameTime};
pub use driver::{AnimationDriver, DriverTuning, OrbitState, TickReport};
pub use error::SessionError;
pub use session::{FrameOutcome, Session};
