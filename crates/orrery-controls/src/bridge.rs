//! Shared handle between the control surface and the animation loop.

use std::sync::{Arc, PoisonError, RwLock};

use crossbeam_channel::{Receiver, Sender, unbounded};
use orrery_catalog::FactSheet;
use tracing::debug;

use crate::controls::Controls;

/// Notifications flowing from the simulation to the control surface.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// The user zoomed; carries the new camera radius.
    CameraDistanceChanged(f32),
    /// A click hit a body.
    BodyPicked(FactSheet),
}

/// Publishes whole [`Controls`] values and hands out per-frame snapshots.
///
/// Writers replace the value atomically; readers get an `Arc` that never
/// changes underneath them. Last write wins. Cloning shares the same state.
#[derive(Debug, Clone)]
pub struct ControlBridge {
    current: Arc<RwLock<Arc<Controls>>>,
    events: Sender<BridgeEvent>,
}

impl ControlBridge {
    /// Create a bridge holding `initial` and the receiving end of its event channel.
    pub fn new(initial: Controls) -> (Self, Receiver<BridgeEvent>) {
        let (events, receiver) = unbounded();
        let bridge = Self {
            current: Arc::new(RwLock::new(Arc::new(initial.sanitized()))),
            events,
        };
        (bridge, receiver)
    }

    /// The current controls. Cheap; holds the lock only to clone the `Arc`.
    pub fn snapshot(&self) -> Arc<Controls> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the controls wholesale.
    pub fn publish(&self, controls: Controls) {
        let next = Arc::new(controls.sanitized());
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }

    /// Read-modify-write under the write lock. Returns what `edit` returned.
    pub fn update<R>(&self, edit: impl FnOnce(&mut Controls) -> R) -> R {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = Controls::clone(&guard);
        let result = edit(&mut next);
        *guard = Arc::new(next.sanitized());
        result
    }

    /// Record a camera distance chosen inside the simulation and announce it.
    pub fn report_camera_distance(&self, distance: f32) {
        self.update(|controls| controls.camera_distance = distance);
        self.emit(BridgeEvent::CameraDistanceChanged(distance));
    }

    /// Send an event. A dropped receiver means nobody is listening.
    pub fn emit(&self, event: BridgeEvent) {
        if let Err(err) = self.events.send(event) {
            debug!(event = ?err.into_inner(), "bridge event dropped, no listener");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EffectMode;

    #[test]
    fn test_snapshot_is_stable_across_publish() {
        let (bridge, _rx) = ControlBridge::new(Controls::default());
        let before = bridge.snapshot();
        bridge.publish(Controls {
            effect: EffectMode::Pulse,
            ..Controls::default()
        });
        assert_eq!(before.effect, EffectMode::Orbit);
        assert_eq!(bridge.snapshot().effect, EffectMode::Pulse);
    }

    #[test]
    fn test_publish_sanitizes() {
        let (bridge, _rx) = ControlBridge::new(Controls::default());
        bridge.publish(Controls {
            scale: -3.0,
            ..Controls::default()
        });
        assert_eq!(bridge.snapshot().scale, 1.0);
    }

    #[test]
    fn test_clones_share_state() {
        let (bridge, _rx) = ControlBridge::new(Controls::default());
        let surface = bridge.clone();
        surface.update(|c| c.playing = false);
        assert!(!bridge.snapshot().playing);
    }

    #[test]
    fn test_report_camera_distance_updates_and_emits() {
        let (bridge, rx) = ControlBridge::new(Controls::default());
        bridge.report_camera_distance(40.0);
        assert_eq!(bridge.snapshot().camera_distance, 40.0);
        assert_eq!(rx.try_recv(), Ok(BridgeEvent::CameraDistanceChanged(40.0)));
    }

    #[test]
    fn test_emit_without_listener_is_harmless() {
        let (bridge, rx) = ControlBridge::new(Controls::default());
        drop(rx);
        bridge.emit(BridgeEvent::CameraDistanceChanged(10.0));
    }

    #[test]
    fn test_publish_from_another_thread() {
        let (bridge, _rx) = ControlBridge::new(Controls::default());
        let writer = bridge.clone();
        std::thread::spawn(move || {
            writer.update(|c| c.time_speed = 3.0);
        })
        .join()
        .unwrap();
        assert_eq!(bridge.snapshot().time_speed, 3.0);
    }
}
