//! Vertex formats and GPU buffers for scene geometry and per-frame instances.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use orrery_scene::mesh::MeshData;
use orrery_scene::{GuideInstance, MeshInstance, PointsInstance, Shading, StarPoint};
use wgpu::util::DeviceExt;

/// Position and normal for lit meshes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 24]);

impl MeshVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        use wgpu::{VertexAttribute, VertexFormat};

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: VertexFormat::Float32x3,
                },
                VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Position and color for lines and point clouds.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(PointVertex, [u8; 28]);

impl PointVertex {
    pub fn white(position: glam::Vec3) -> Self {
        Self {
            position: position.to_array(),
            color: [1.0; 4],
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        use wgpu::{VertexAttribute, VertexFormat};

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: VertexFormat::Float32x3,
                },
                VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: VertexFormat::Float32x4,
                },
            ],
        }
    }
}

impl From<&StarPoint> for PointVertex {
    fn from(star: &StarPoint) -> Self {
        let [r, g, b] = star.color;
        Self {
            position: star.position.to_array(),
            color: [r, g, b, 1.0],
        }
    }
}

/// Per-instance model matrix, linear RGBA color and shading parameters
/// (`params[0]` is 1.0 for lit shading).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub params: [f32; 4],
}

static_assertions::assert_eq_size!(InstanceRaw, [u8; 96]);

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
    ];

    pub fn new(model: Mat4, color: [f32; 4], lit: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            params: [if lit { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<&MeshInstance> for InstanceRaw {
    fn from(instance: &MeshInstance) -> Self {
        Self::new(
            instance.model,
            instance.color,
            instance.shading == Shading::Lit,
        )
    }
}

impl From<&GuideInstance> for InstanceRaw {
    fn from(guide: &GuideInstance) -> Self {
        Self::new(guide.model, guide.color, false)
    }
}

impl From<&PointsInstance> for InstanceRaw {
    fn from(points: &PointsInstance) -> Self {
        Self::new(points.model, points.tint, false)
    }
}

/// Indexed mesh with both triangle and edge index buffers.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub wire_index_buffer: wgpu::Buffer,
    pub wire_index_count: u32,
}

impl MeshBuffer {
    pub fn from_mesh(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertices: Vec<MeshVertex> = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .map(|(p, n)| MeshVertex {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect();
        let wire = mesh.wire_indices();

        Self {
            vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-vertices")),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-indices")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: mesh.indices.len() as u32,
            wire_index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-wire-indices")),
                contents: bytemuck::cast_slice(&wire),
                usage: wgpu::BufferUsages::INDEX,
            }),
            wire_index_count: wire.len() as u32,
        }
    }

    /// Draw triangles for instances in `instances`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, instances: std::ops::Range<u32>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, instances);
    }

    /// Draw edges for instances in `instances`. Needs a line-list pipeline.
    pub fn draw_wire(&self, pass: &mut wgpu::RenderPass<'_>, instances: std::ops::Range<u32>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.wire_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.wire_index_count, 0, instances);
    }
}

/// Non-indexed vertices drawn as a line strip or point list.
pub struct PointBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl PointBuffer {
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[PointVertex]) -> Self {
        Self {
            vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            vertex_count: vertices.len() as u32,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, instance: u32) {
        if self.vertex_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, instance..instance + 1);
    }
}

/// Instance data rewritten every frame. Grows to the next power of two when a
/// frame needs more room than it has.
pub struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
}

impl InstanceBuffer {
    pub const INITIAL_CAPACITY: usize = 64;

    pub fn new(device: &wgpu::Device) -> Self {
        Self::with_capacity(device, Self::INITIAL_CAPACITY)
    }

    fn with_capacity(device: &wgpu::Device, capacity: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance-buffer"),
            size: (capacity * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, capacity }
    }

    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[InstanceRaw]) {
        if instances.len() > self.capacity {
            let capacity = instances.len().next_power_of_two();
            log::debug!("Growing instance buffer {} -> {}", self.capacity, capacity);
            *self = Self::with_capacity(device, capacity);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}
