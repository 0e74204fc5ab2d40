//! Window, renderer and session lifecycle driven by winit.
//!
//! [`OrreryApp`] implements [`ApplicationHandler`]: the window, GPU renderer
//! and [`Session`] are created on `resumed`, pointer and keyboard input is
//! routed to the session and the control bridge, and every redraw runs one
//! tick.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use orrery_camera::Viewport;
use orrery_catalog::Catalog;
use orrery_config::{CliArgs, Config};
use orrery_controls::ControlBridge;
use orrery_render::{OrreryRenderer, init_render_context_blocking};
use orrery_sim::{FrameOutcome, Session};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::ModifiersState;
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::keymap::{KeyAction, action_for};

/// Pixels of zoom per wheel line.
pub const LINE_SCROLL_PIXELS: f32 = 100.0;

pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Wheel delta in the rig's convention: positive moves the camera away.
pub fn wheel_delta(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * LINE_SCROLL_PIXELS,
        MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => -(y as f32),
    }
}

pub struct OrreryApp {
    config: Config,
    config_dir: PathBuf,
    cli: CliArgs,
    catalog: Catalog,
    body_names: Vec<String>,
    bridge: ControlBridge,
    seed: u64,
    window: Option<Arc<Window>>,
    renderer: Option<OrreryRenderer>,
    session: Option<Session>,
    pointer: Vec2,
    modifiers: ModifiersState,
}

impl OrreryApp {
    pub fn new(
        config: Config,
        config_dir: PathBuf,
        cli: CliArgs,
        catalog: Catalog,
        bridge: ControlBridge,
        seed: u64,
    ) -> Self {
        let body_names = catalog.names().map(str::to_string).collect();
        Self {
            config,
            config_dir,
            cli,
            catalog,
            body_names,
            bridge,
            seed,
            window: None,
            renderer: None,
            session: None,
            pointer: Vec2::ZERO,
            modifiers: ModifiersState::empty(),
        }
    }

    #[instrument(skip_all, fields(seed = self.seed))]
    fn start(&mut self, event_loop: &ActiveEventLoop) {
        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("Failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };
        let size = window.inner_size();
        info!(
            "Window created: {}x{} (scale: {:.2})",
            size.width,
            size.height,
            window.scale_factor()
        );

        let ctx = match init_render_context_blocking(window.clone(), self.config.render.vsync) {
            Ok(ctx) => ctx,
            Err(err) => {
                error!("GPU initialization failed: {err}");
                event_loop.exit();
                return;
            }
        };
        let renderer = OrreryRenderer::new(ctx, &self.config.render);

        let session = match Session::mount(
            self.catalog.clone(),
            self.bridge.clone(),
            &self.config,
            self.seed,
            Viewport::new(size.width, size.height),
            Instant::now(),
        ) {
            Ok(session) => session,
            Err(err) => {
                error!("Session mount failed: {err}");
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.renderer = Some(renderer);
        self.session = Some(session);
        self.window = Some(window);
    }

    /// Tear the session down, then drop the renderer before the window whose
    /// surface it holds.
    fn shutdown(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.teardown();
        }
        self.session = None;
        self.renderer = None;
        self.window = None;
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(session), Some(renderer)) = (self.session.as_mut(), self.renderer.as_mut())
        else {
            return;
        };
        match session.frame(Instant::now(), renderer) {
            Ok(FrameOutcome::Rendered(_)) => self.request_redraw(),
            Ok(FrameOutcome::Stopped) => {}
            Err(err) if err.is_fatal() => {
                error!("Rendering stopped: {err}");
                self.shutdown();
                event_loop.exit();
            }
            Err(err) => {
                warn!("Frame skipped: {err}");
                self.request_redraw();
            }
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let (Some(session), Some(renderer)) = (self.session.as_mut(), self.renderer.as_mut()) {
            session.resize(width, height, renderer);
            debug!("Resized to {width}x{height}");
        }
    }

    fn pointer_button(&mut self, state: ElementState) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match state {
            ElementState::Pressed => session.pointer_down(self.pointer),
            ElementState::Released => {
                session.release(self.pointer);
            }
        }
    }

    fn key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match action_for(&event.logical_key, self.modifiers, &self.body_names) {
            Some(KeyAction::Control(command)) => {
                let changed = self.bridge.update(|controls| controls.apply(&command));
                debug!(?command, changed, "control command");
            }
            Some(KeyAction::ReloadConfig) => self.reload_config(),
            None => {}
        }
    }

    fn reload_config(&mut self) {
        match self.config.reload(&self.config_dir) {
            Ok(Some(mut config)) => {
                config.apply_cli_overrides(&self.cli);
                if let Some(session) = self.session.as_mut() {
                    session.apply_config(&config);
                }
                self.config = config;
                info!("Applied reloaded config");
            }
            Ok(None) => info!("Config unchanged"),
            Err(err) => warn!("Config reload failed: {err}"),
        }
    }
}

impl ApplicationHandler for OrreryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.start(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = Vec2::new(position.x as f32, position.y as f32);
                if let Some(session) = self.session.as_mut() {
                    session.pointer_move(self.pointer);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.pointer_button(state),
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(session) = self.session.as_mut() {
                    session.scroll(wheel_delta(delta));
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.key(&event),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
