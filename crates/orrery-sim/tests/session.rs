//! End-to-end session behaviour against a renderer that records what it was given.

use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};
use orrery_camera::{Camera, Viewport};
use orrery_catalog::Catalog;
use orrery_config::Config;
use orrery_controls::{BridgeEvent, ControlBridge, Controls, EffectMode};
use orrery_scene::{RenderError, SceneGraph, SceneRenderer};
use orrery_sim::{FrameOutcome, Session};

#[derive(Default)]
struct RecordingRenderer {
    cameras: Vec<Camera>,
    visible_bodies: Vec<usize>,
    resizes: Vec<(u32, u32)>,
    fail_with: Option<RenderError>,
}

impl SceneRenderer for RecordingRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<(), RenderError> {
        if let Some(err) = self.fail_with.clone() {
            return Err(err);
        }
        self.cameras.push(camera.clone());
        self.visible_bodies
            .push(scene.bodies().iter().filter(|b| b.visible).count());
        Ok(())
    }
}

struct Harness {
    session: Session,
    renderer: RecordingRenderer,
    events: crossbeam_channel::Receiver<BridgeEvent>,
    bridge: ControlBridge,
    start: Instant,
    now: Instant,
}

impl Harness {
    fn new() -> Self {
        let catalog = Catalog::solar_system().unwrap();
        let (bridge, events) = ControlBridge::new(Controls::for_catalog(&catalog));
        let mut config = Config::default();
        config.scene.star_count = 100;
        let start = Instant::now();
        let session = Session::mount(
            catalog,
            bridge.clone(),
            &config,
            21,
            Viewport::new(800, 600),
            start,
        )
        .unwrap();
        Self {
            session,
            renderer: RecordingRenderer::default(),
            events,
            bridge,
            start,
            now: start,
        }
    }

    /// Hide every body except `name` so nothing else can sit in front of it.
    fn isolate(&self, name: &str) {
        let others: Vec<String> = self
            .session
            .catalog()
            .names()
            .filter(|n| *n != name)
            .map(str::to_string)
            .collect();
        self.bridge.update(|c| {
            for other in &others {
                c.body_mut(other).visible = false;
            }
        });
    }

    fn frame(&mut self, millis: u64) -> FrameOutcome {
        self.now += Duration::from_millis(millis);
        self.session.frame(self.now, &mut self.renderer).unwrap()
    }

    /// Pixel position of a body's centre through the last rendered camera.
    fn body_pixel(&self, name: &str) -> Vec2 {
        let scene = self.session.scene().unwrap();
        let camera = self.session.last_camera().unwrap();
        let position = scene.body_by_name(name).unwrap().position;
        let ndc = camera.world_to_ndc(position).unwrap().truncate();
        self.session.viewport().ndc_to_pixel(ndc)
    }
}

#[test]
fn test_frame_renders_with_rig_camera() {
    let mut h = Harness::new();
    assert!(matches!(h.frame(16), FrameOutcome::Rendered(_)));
    h.frame(16);

    let rig = h.session.rig().unwrap();
    let orbit = rig.orbit();
    let (sp, cp) = orbit.polar.sin_cos();
    let (sa, ca) = orbit.azimuth.sin_cos();
    let expected = orbit.radius * Vec3::new(sp * ca, cp, sp * sa);

    let last = h.renderer.cameras.last().unwrap();
    assert!((last.position - expected).length() < 1e-5);
    assert_eq!(h.session.last_camera(), Some(last));
}

#[test]
fn test_click_on_body_reports_it_and_emits_event() {
    let mut h = Harness::new();
    h.isolate("Jupiter");
    h.frame(16);
    let pixel = h.body_pixel("Jupiter");

    h.session.pointer_down(pixel);
    h.session.pointer_up();
    let facts = h.session.click(pixel).unwrap();
    assert_eq!(facts.name, "Jupiter");
    assert_eq!(
        h.events.try_recv(),
        Ok(BridgeEvent::BodyPicked(facts.clone()))
    );
}

#[test]
fn test_click_on_background_reports_nothing() {
    let mut h = Harness::new();
    h.frame(16);
    let corner = Vec2::new(2.0, 2.0);
    h.session.pointer_down(corner);
    h.session.pointer_up();
    assert!(h.session.click(corner).is_none());
    assert!(h.events.try_recv().is_err());
}

#[test]
fn test_click_after_drag_is_swallowed() {
    let mut h = Harness::new();
    h.frame(16);
    let pixel = h.body_pixel("Saturn");

    h.session.pointer_down(pixel - Vec2::new(60.0, 0.0));
    h.session.pointer_move(pixel);
    h.session.pointer_up();
    assert!(h.session.click(pixel).is_none());
}

#[test]
fn test_release_after_press_picks_body() {
    let mut h = Harness::new();
    h.isolate("Jupiter");
    h.frame(16);
    let pixel = h.body_pixel("Jupiter");

    h.session.pointer_down(pixel);
    let facts = h.session.release(pixel).unwrap();
    assert_eq!(facts.name, "Jupiter");
    assert!(!h.session.rig().unwrap().is_dragging());
}

#[test]
fn test_release_without_press_does_not_pick() {
    let mut h = Harness::new();
    h.isolate("Jupiter");
    h.frame(16);
    let pixel = h.body_pixel("Jupiter");

    assert!(h.session.release(pixel).is_none());
    assert!(h.events.try_recv().is_err());

    // The next real click still works.
    h.session.pointer_down(pixel);
    assert!(h.session.release(pixel).is_some());
}

#[test]
fn test_release_after_drag_does_not_pick() {
    let mut h = Harness::new();
    h.isolate("Jupiter");
    h.frame(16);
    let pixel = h.body_pixel("Jupiter");

    h.session.pointer_down(pixel - Vec2::new(60.0, 0.0));
    h.session.pointer_move(pixel);
    assert!(h.session.release(pixel).is_none());
    assert!(h.events.try_recv().is_err());
}

#[test]
fn test_scroll_publishes_distance_and_survives_next_frame() {
    let mut h = Harness::new();
    h.frame(16);
    let radius = h.session.scroll(500.0).unwrap();
    assert_eq!(radius, 30.0);
    assert_eq!(
        h.events.try_recv(),
        Ok(BridgeEvent::CameraDistanceChanged(30.0))
    );
    assert_eq!(h.bridge.snapshot().camera_distance, 30.0);

    h.frame(16);
    assert_eq!(h.session.rig().unwrap().orbit().radius, 30.0);
}

#[test]
fn test_published_distance_moves_camera_even_when_paused() {
    let mut h = Harness::new();
    h.bridge.update(|c| {
        c.playing = false;
        c.camera_distance = 70.0;
    });
    h.frame(16);
    assert_eq!(h.session.rig().unwrap().orbit().radius, 70.0);
}

#[test]
fn test_pause_keeps_angles_across_frames() {
    let mut h = Harness::new();
    h.frame(16);
    h.frame(16);
    h.bridge.update(|c| c.playing = false);
    let before = h.session.driver().unwrap().orbits().to_vec();
    for _ in 0..30 {
        h.frame(33);
    }
    assert_eq!(h.session.driver().unwrap().orbits(), before.as_slice());
    assert_eq!(h.renderer.cameras.len(), 32);
}

#[test]
fn test_debris_toggling_keeps_single_field() {
    let mut h = Harness::new();
    h.bridge.update(|c| {
        c.effect = EffectMode::Debris;
        c.particle_count = 5000;
    });
    h.frame(16);
    let first = h.session.scene().unwrap().asteroid_field().unwrap().points.clone();
    assert_eq!(first.len(), 2000);

    for effect in [EffectMode::Orbit, EffectMode::Debris, EffectMode::Orbit] {
        h.bridge.update(|c| c.effect = effect);
        h.frame(16);
    }
    let field = h.session.scene().unwrap().asteroid_field().unwrap();
    assert_eq!(field.points, first);
}

#[test]
fn test_visibility_toggle_reaches_renderer() {
    let mut h = Harness::new();
    h.frame(16);
    h.bridge.update(|c| c.body_mut("Uranus").visible = false);
    h.frame(16);
    assert_eq!(h.renderer.visible_bodies, vec![8, 7]);
}

#[test]
fn test_resize_updates_aspect_and_renderer() {
    let mut h = Harness::new();
    h.session.resize(1000, 500, &mut h.renderer);
    assert_eq!(h.renderer.resizes, vec![(1000, 500)]);
    h.frame(16);
    let camera = h.renderer.cameras.last().unwrap();
    match camera.projection {
        orrery_camera::Projection::Perspective { aspect_ratio, .. } => {
            assert!((aspect_ratio - 2.0).abs() < 1e-6);
        }
        _ => panic!("expected perspective projection"),
    }
}

#[test]
fn test_render_error_propagates() {
    let mut h = Harness::new();
    h.renderer.fail_with = Some(RenderError::SurfaceLost);
    let result = h.session.frame(h.start, &mut h.renderer);
    assert_eq!(result, Err(RenderError::SurfaceLost));
    assert!(h.session.last_camera().is_none());
}

#[test]
fn test_teardown_stops_everything() {
    let mut h = Harness::new();
    h.frame(16);
    h.session.teardown();
    assert!(!h.session.is_mounted());
    assert_eq!(h.frame(16), FrameOutcome::Stopped);
    assert_eq!(h.renderer.cameras.len(), 1);

    h.session.pointer_down(Vec2::ZERO);
    h.session.pointer_move(Vec2::new(100.0, 100.0));
    h.session.pointer_up();
    assert!(h.session.click(Vec2::ZERO).is_none());
    assert!(h.session.release(Vec2::ZERO).is_none());
    assert!(h.session.scroll(10.0).is_none());
    h.session.resize(640, 480, &mut h.renderer);
    assert!(h.renderer.resizes.is_empty());
    h.session.teardown();
}
