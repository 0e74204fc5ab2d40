//! One mounted simulation: scene, camera rig, driver and clock, plus the
//! bridge they talk to the control surface through.

use std::time::Instant;

use glam::Vec2;
use orrery_camera::{Camera, CameraRig, RigTuning, Viewport};
use orrery_catalog::{Catalog, FactSheet};
use orrery_config::Config;
use orrery_controls::{BridgeEvent, ControlBridge};
use orrery_scene::{RenderError, SceneBuilder, SceneGraph, SceneRenderer, SceneSettings};
use tracing::{debug, info, instrument};

use crate::clock::FrameClock;
use crate::driver::{AnimationDriver, DriverTuning, TickReport};
use crate::error::SessionError;

/// Result of [`Session::frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// A tick ran and a frame was submitted. Schedule the next one.
    Rendered(TickReport),
    /// The session was torn down. Stop scheduling.
    Stopped,
}

struct Live {
    scene: SceneGraph,
    rig: CameraRig,
    driver: AnimationDriver,
}

/// Owns everything a running simulation needs. Nothing is global.
pub struct Session {
    catalog: Catalog,
    bridge: ControlBridge,
    live: Option<Live>,
    clock: FrameClock,
    viewport: Viewport,
    last_camera: Option<Camera>,
}

impl Session {
    /// Build the scene and start the clock at `now`.
    #[instrument(skip_all, fields(seed = seed, width = viewport.width, height = viewport.height))]
    pub fn mount(
        catalog: Catalog,
        bridge: ControlBridge,
        config: &Config,
        seed: u64,
        viewport: Viewport,
        now: Instant,
    ) -> Result<Self, SessionError> {
        let scene = SceneBuilder::new(SceneSettings::from_config(config, seed)).build(&catalog)?;
        let rig = CameraRig::from_config(&config.camera);
        let driver = AnimationDriver::new(&scene, DriverTuning::from(&config.simulation));
        info!(bodies = scene.bodies().len(), "session mounted");
        Ok(Self {
            catalog,
            bridge,
            live: Some(Live { scene, rig, driver }),
            clock: FrameClock::new(now),
            viewport,
            last_camera: None,
        })
    }

    pub fn is_mounted(&self) -> bool {
        self.live.is_some()
    }

    /// Advance one tick at `now` and draw it.
    pub fn frame(
        &mut self,
        now: Instant,
        renderer: &mut dyn SceneRenderer,
    ) -> Result<FrameOutcome, RenderError> {
        let Some(live) = self.live.as_mut() else {
            return Ok(FrameOutcome::Stopped);
        };
        let time = self.clock.advance(now);
        let controls = self.bridge.snapshot();
        let report = live.driver.tick(time, &controls, &mut live.scene, &mut live.rig);

        let camera = live.rig.camera(self.viewport.aspect());
        renderer.render(&live.scene, &camera)?;
        self.last_camera = Some(camera);
        Ok(FrameOutcome::Rendered(report))
    }

    /// Primary button pressed at `pointer` (physical pixels).
    pub fn pointer_down(&mut self, pointer: Vec2) {
        if let Some(live) = self.live.as_mut() {
            live.rig.drag_start(pointer);
        }
    }

    pub fn pointer_move(&mut self, pointer: Vec2) {
        if let Some(live) = self.live.as_mut() {
            live.rig.drag_move(pointer);
        }
    }

    pub fn pointer_up(&mut self) {
        if let Some(live) = self.live.as_mut() {
            live.rig.drag_end();
        }
    }

    /// Primary button released at `pointer`: ends the drag and picks, unless no
    /// press was seen (the press happened outside the window) or the gesture was
    /// a drag rather than a click.
    pub fn release(&mut self, pointer: Vec2) -> Option<FactSheet> {
        let pressed = self.live.as_ref()?.rig.is_dragging();
        self.pointer_up();
        if !pressed {
            debug!("release without press ignored");
            return None;
        }
        self.click(pointer)
    }

    /// A click at `pointer`. Reports the body under it unless the click ends a drag.
    pub fn click(&mut self, pointer: Vec2) -> Option<FactSheet> {
        let live = self.live.as_mut()?;
        if !live.rig.accept_click() {
            debug!("click swallowed after drag");
            return None;
        }
        let ndc = self.viewport.pixel_to_ndc(pointer)?;
        let camera = live.rig.camera(self.viewport.aspect());
        let facts = live.scene.pick_at(&camera, ndc)?.facts.clone();
        info!(body = %facts.name, "body picked");
        self.bridge.emit(BridgeEvent::BodyPicked(facts.clone()));
        Some(facts)
    }

    /// Wheel input. Returns the new camera distance, which is also published.
    pub fn scroll(&mut self, delta_y: f32) -> Option<f32> {
        let live = self.live.as_mut()?;
        let radius = live.rig.scroll(delta_y);
        self.bridge.report_camera_distance(radius);
        Some(radius)
    }

    /// Track a new drawable size and resize the renderer's targets with it.
    pub fn resize(&mut self, width: u32, height: u32, renderer: &mut dyn SceneRenderer) {
        if self.live.is_none() {
            return;
        }
        self.viewport = Viewport::new(width, height);
        renderer.resize(width, height);
    }

    /// Re-apply camera and simulation tuning from a reloaded config.
    pub fn apply_config(&mut self, config: &Config) {
        if let Some(live) = self.live.as_mut() {
            live.rig.set_tuning(RigTuning::from(&config.camera));
            live.driver.set_tuning(DriverTuning::from(&config.simulation));
        }
    }

    /// Release the scene and stop ticking. Every later call is a no-op.
    pub fn teardown(&mut self) {
        if self.live.take().is_some() {
            self.last_camera = None;
            info!(frames = self.clock.frame_count(), "session torn down");
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn bridge(&self) -> &ControlBridge {
        &self.bridge
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.live.as_ref().map(|live| &live.scene)
    }

    pub fn rig(&self) -> Option<&CameraRig> {
        self.live.as_ref().map(|live| &live.rig)
    }

    pub fn driver(&self) -> Option<&AnimationDriver> {
        self.live.as_ref().map(|live| &live.driver)
    }

    /// The camera handed to the renderer by the last successful frame.
    pub fn last_camera(&self) -> Option<&Camera> {
        self.last_camera.as_ref()
    }
}
