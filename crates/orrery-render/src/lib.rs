//! wgpu backend for the orrery: device and surface setup, reverse-Z depth,
//! instanced mesh and point pipelines, and [`OrreryRenderer`], which presents a
//! [`SceneGraph`](orrery_scene::SceneGraph) through a camera.

pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod pipeline;
mod renderer;
pub mod shader;
#[cfg(test)]
mod test_device;

pub use buffer::{InstanceBuffer, InstanceRaw, MeshBuffer, MeshVertex, PointBuffer, PointVertex};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, init_render_context_blocking};
pub use pipeline::{FrameUniform, MeshPipelines, PointPipelines};
pub use renderer::OrreryRenderer;
