//! Render pipelines and the frame uniform they share.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use orrery_camera::Camera;
use orrery_scene::Lighting;

use crate::buffer::{InstanceRaw, MeshVertex, PointVertex};
use crate::depth::DepthBuffer;
use crate::shader;

/// Camera and lights for one frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// Ambient color premultiplied by intensity.
    pub ambient: [f32; 4],
    /// Point light position in xyz, range in w.
    pub point_position_range: [f32; 4],
    pub point_color_intensity: [f32; 4],
    /// Direction the sunlight travels in xyz.
    pub sun_direction: [f32; 4],
    pub sun_color_intensity: [f32; 4],
}

static_assertions::assert_eq_size!(FrameUniform, [u8; 160]);

impl FrameUniform {
    pub const SIZE: u64 = std::mem::size_of::<FrameUniform>() as u64;

    pub fn new(camera: &Camera, lighting: &Lighting) -> Self {
        let [ar, ag, ab] = lighting.ambient.to_linear();
        let k = lighting.ambient_intensity;
        let point = &lighting.point;
        let sun = &lighting.directional;
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            ambient: [ar * k, ag * k, ab * k, 1.0],
            point_position_range: point.position.extend(point.range).to_array(),
            point_color_intensity: point.color.with_alpha(point.intensity),
            sun_direction: sun.direction.extend(0.0).to_array(),
            sun_color_intensity: sun.color.with_alpha(sun.intensity),
        }
    }
}

pub fn frame_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("frame-bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(FrameUniform::SIZE),
            },
            count: None,
        }],
    })
}

struct PipelineDesc<'a> {
    label: &'a str,
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
}

fn build(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    module: &wgpu::ShaderModule,
    vertex: wgpu::VertexBufferLayout<'static>,
    surface_format: wgpu::TextureFormat,
    desc: PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: &[vertex, InstanceRaw::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(DepthBuffer::stencil_state(desc.depth_write)),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

fn pipeline_layout(
    device: &wgpu::Device,
    label: &str,
    frame_layout: &wgpu::BindGroupLayout,
) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[frame_layout],
        immediate_size: 0,
    })
}

/// Instanced meshes: filled opaque, wireframe, and alpha-blended.
pub struct MeshPipelines {
    pub opaque: wgpu::RenderPipeline,
    pub wireframe: wgpu::RenderPipeline,
    /// No depth writes, no culling. For the corona and rings.
    pub translucent: wgpu::RenderPipeline,
}

impl MeshPipelines {
    pub fn new(
        device: &wgpu::Device,
        frame_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let module = shader::compile(device, "mesh", &shader::mesh_source());
        let layout = pipeline_layout(device, "mesh-pipeline-layout", frame_layout);
        let make = |desc| build(device, &layout, &module, MeshVertex::layout(), surface_format, desc);

        Self {
            opaque: make(PipelineDesc {
                label: "mesh-opaque",
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                blend: None,
                depth_write: true,
            }),
            wireframe: make(PipelineDesc {
                label: "mesh-wireframe",
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
                blend: None,
                depth_write: true,
            }),
            translucent: make(PipelineDesc {
                label: "mesh-translucent",
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth_write: false,
            }),
        }
    }
}

/// Colored vertices: line strips for orbit guides, point lists for the
/// starfield and asteroids. Both blend and leave depth untouched.
pub struct PointPipelines {
    pub lines: wgpu::RenderPipeline,
    pub points: wgpu::RenderPipeline,
}

impl PointPipelines {
    pub fn new(
        device: &wgpu::Device,
        frame_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let module = shader::compile(device, "points", &shader::points_source());
        let layout = pipeline_layout(device, "points-pipeline-layout", frame_layout);
        let make =
            |desc| build(device, &layout, &module, PointVertex::layout(), surface_format, desc);

        Self {
            lines: make(PipelineDesc {
                label: "guide-lines",
                topology: wgpu::PrimitiveTopology::LineStrip,
                cull_mode: None,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth_write: false,
            }),
            points: make(PipelineDesc {
                label: "point-cloud",
                topology: wgpu::PrimitiveTopology::PointList,
                cull_mode: None,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth_write: false,
            }),
        }
    }
}
