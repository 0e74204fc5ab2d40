//! Orbit camera for the orrery.
//!
//! [`CameraRig`] owns the spherical camera state and turns pointer gestures,
//! wheel input and auto-rotation into it. [`Camera`] is the derived view used by
//! both the renderer and picking, and [`Ray`] carries a pointer into the scene.

mod camera;
mod ray;
mod rig;

pub use camera::{Camera, Projection};
pub use ray::{Ray, Viewport};
pub use rig::{CameraRig, Gesture, OrbitState, RigTuning};
