//! [`OrreryRenderer`]: the wgpu implementation of [`SceneRenderer`].

use std::collections::HashMap;

use orrery_camera::Camera;
use orrery_config::RenderConfig;
use orrery_scene::mesh::{annulus, icosphere};
use orrery_scene::{BodyKey, DrawList, MeshKind, RenderError, SceneGraph, SceneRenderer};

use crate::buffer::{InstanceBuffer, InstanceRaw, MeshBuffer, PointBuffer, PointVertex};
use crate::depth::DepthBuffer;
use crate::gpu::RenderContext;
use crate::pipeline::{FrameUniform, MeshPipelines, PointPipelines, frame_bind_group_layout};

/// One frame's instance data and the draws that index into it.
#[derive(Debug, Default, PartialEq)]
struct FramePlan {
    instances: Vec<InstanceRaw>,
    opaque: Vec<(MeshKind, u32)>,
    wireframe: Vec<(MeshKind, u32)>,
    translucent: Vec<(MeshKind, u32)>,
    guides: Vec<(BodyKey, u32)>,
    starfield: Option<u32>,
    asteroids: Option<u32>,
}

impl FramePlan {
    fn push(&mut self, raw: InstanceRaw) -> u32 {
        self.instances.push(raw);
        (self.instances.len() - 1) as u32
    }
}

impl From<&DrawList> for FramePlan {
    fn from(list: &DrawList) -> Self {
        let mut plan = FramePlan::default();
        for instance in &list.opaque {
            let index = plan.push(instance.into());
            if instance.wireframe {
                plan.wireframe.push((instance.mesh, index));
            } else {
                plan.opaque.push((instance.mesh, index));
            }
        }
        for instance in &list.translucent {
            let index = plan.push(instance.into());
            plan.translucent.push((instance.mesh, index));
        }
        for guide in &list.guides {
            let index = plan.push(guide.into());
            plan.guides.push((guide.body, index));
        }
        if let Some(points) = &list.starfield {
            plan.starfield = Some(plan.push(points.into()));
        }
        if let Some(points) = &list.asteroids {
            plan.asteroids = Some(plan.push(points.into()));
        }
        plan
    }
}

fn clear_color([r, g, b, a]: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

/// Draws a [`SceneGraph`] into a window surface.
///
/// The sphere mesh is built up front. Ring meshes, orbit guides and the
/// starfield are uploaded the first time a scene shows them; the asteroid
/// field is uploaded once it exists.
pub struct OrreryRenderer {
    ctx: RenderContext,
    depth: DepthBuffer,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    meshes: MeshPipelines,
    points: PointPipelines,
    sphere: MeshBuffer,
    rings: HashMap<BodyKey, MeshBuffer>,
    guides: HashMap<BodyKey, PointBuffer>,
    starfield: Option<PointBuffer>,
    asteroids: Option<PointBuffer>,
    instances: InstanceBuffer,
    ring_segments: u32,
}

impl OrreryRenderer {
    pub fn new(ctx: RenderContext, config: &RenderConfig) -> Self {
        let device = &ctx.device;
        let (width, height) = ctx.size();

        let frame_layout = frame_bind_group_layout(device);
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-uniform"),
            size: FrameUniform::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let meshes = MeshPipelines::new(device, &frame_layout, ctx.surface_format);
        let points = PointPipelines::new(device, &frame_layout, ctx.surface_format);
        let sphere = MeshBuffer::from_mesh(device, "sphere", &icosphere(config.sphere_subdivisions));
        log::info!(
            "Renderer ready: {}x{}, sphere with {} triangles",
            width,
            height,
            sphere.index_count / 3
        );

        Self {
            depth: DepthBuffer::new(device, width, height),
            instances: InstanceBuffer::new(device),
            frame_buffer,
            frame_bind_group,
            meshes,
            points,
            sphere,
            rings: HashMap::new(),
            guides: HashMap::new(),
            starfield: None,
            asteroids: None,
            ring_segments: config.ring_segments.max(3),
            ctx,
        }
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Upload geometry the scene shows for the first time.
    fn prepare(&mut self, scene: &SceneGraph) {
        let device = &self.ctx.device;
        for node in scene.bodies() {
            if let Some(ring) = &node.ring
                && !self.rings.contains_key(&node.key)
            {
                let mesh = annulus(ring.inner, ring.outer, self.ring_segments);
                let label = format!("{}-ring", node.name);
                self.rings
                    .insert(node.key, MeshBuffer::from_mesh(device, &label, &mesh));
            }
            if let Some(guide) = &node.guide
                && !self.guides.contains_key(&node.key)
            {
                let vertices: Vec<PointVertex> =
                    guide.points.iter().copied().map(PointVertex::white).collect();
                let label = format!("{}-orbit", node.name);
                self.guides
                    .insert(node.key, PointBuffer::new(device, &label, &vertices));
            }
        }
        if self.starfield.is_none() {
            let vertices: Vec<PointVertex> =
                scene.starfield().points.iter().map(PointVertex::from).collect();
            log::debug!("Uploading starfield ({} points)", vertices.len());
            self.starfield = Some(PointBuffer::new(device, "starfield", &vertices));
        }
        if self.asteroids.is_none()
            && let Some(field) = scene.asteroid_field()
        {
            let vertices: Vec<PointVertex> =
                field.points.iter().copied().map(PointVertex::white).collect();
            log::debug!("Uploading asteroid field ({} points)", vertices.len());
            self.asteroids = Some(PointBuffer::new(device, "asteroids", &vertices));
        }
    }

    fn mesh(&self, kind: MeshKind) -> Option<&MeshBuffer> {
        match kind {
            MeshKind::Sphere => Some(&self.sphere),
            MeshKind::Ring(key) => self.rings.get(&key),
        }
    }
}

impl SceneRenderer for OrreryRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.ctx.resize(width, height);
        self.depth.resize(&self.ctx.device, width, height);
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<(), RenderError> {
        self.prepare(scene);
        let list = scene.draw_list();
        let plan = FramePlan::from(&list);

        let uniform = FrameUniform::new(camera, scene.lighting());
        self.ctx
            .queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&uniform));
        self.instances
            .write(&self.ctx.device, &self.ctx.queue, &plan.instances);

        let frame = self.ctx.acquire_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("orrery-frame"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(list.clear_color)),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instances.slice());

            if let (Some(index), Some(stars)) = (plan.starfield, &self.starfield) {
                pass.set_pipeline(&self.points.points);
                stars.draw(&mut pass, index);
            }

            pass.set_pipeline(&self.meshes.opaque);
            for &(kind, index) in &plan.opaque {
                if let Some(mesh) = self.mesh(kind) {
                    mesh.draw(&mut pass, index..index + 1);
                }
            }
            if !plan.wireframe.is_empty() {
                pass.set_pipeline(&self.meshes.wireframe);
                for &(kind, index) in &plan.wireframe {
                    if let Some(mesh) = self.mesh(kind) {
                        mesh.draw_wire(&mut pass, index..index + 1);
                    }
                }
            }

            pass.set_pipeline(&self.points.lines);
            for (key, index) in &plan.guides {
                if let Some(guide) = self.guides.get(key) {
                    guide.draw(&mut pass, *index);
                }
            }
            if let (Some(index), Some(asteroids)) = (plan.asteroids, &self.asteroids) {
                pass.set_pipeline(&self.points.points);
                asteroids.draw(&mut pass, index);
            }

            pass.set_pipeline(&self.meshes.translucent);
            for &(kind, index) in &plan.translucent {
                if let Some(mesh) = self.mesh(kind) {
                    mesh.draw(&mut pass, index..index + 1);
                }
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_catalog::Catalog;
    use orrery_scene::{SceneBuilder, SceneSettings};

    fn scene() -> SceneGraph {
        SceneBuilder::new(SceneSettings {
            star_count: 10,
            ..SceneSettings::default()
        })
        .build(&Catalog::solar_system().unwrap())
        .unwrap()
    }

    #[test]
    fn test_plan_indexes_every_instance_once() {
        let list = scene().draw_list();
        let plan = FramePlan::from(&list);
        let draws = plan.opaque.len()
            + plan.wireframe.len()
            + plan.translucent.len()
            + plan.guides.len()
            + usize::from(plan.starfield.is_some())
            + usize::from(plan.asteroids.is_some());
        assert_eq!(draws, plan.instances.len());

        let mut seen: Vec<u32> = plan
            .opaque
            .iter()
            .chain(&plan.wireframe)
            .chain(&plan.translucent)
            .map(|(_, i)| *i)
            .chain(plan.guides.iter().map(|(_, i)| *i))
            .chain(plan.starfield)
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), plan.instances.len());
    }

    #[test]
    fn test_plan_routes_wireframe_bodies() {
        let mut scene = scene();
        for node in scene.bodies_mut() {
            node.wireframe = true;
        }
        let plan = FramePlan::from(&scene.draw_list());
        assert_eq!(plan.wireframe.len(), 8);
        // Star and markers stay filled.
        assert_eq!(plan.opaque.len(), 9);
    }

    #[test]
    fn test_plan_includes_asteroids_once_present() {
        let mut scene = scene();
        assert!(FramePlan::from(&scene.draw_list()).asteroids.is_none());
        scene.ensure_asteroid_field(50, orrery_catalog::Rgb(0xffd700));
        let plan = FramePlan::from(&scene.draw_list());
        let index = plan.asteroids.unwrap() as usize;
        assert_eq!(plan.instances[index].params[0], 0.0);
    }

    #[test]
    fn test_clear_color_widens_channels() {
        let color = clear_color([0.0, 0.5, 1.0, 1.0]);
        assert_eq!(color.g, 0.5);
        assert_eq!(color.a, 1.0);
    }
}
