//! Reverse-Z depth buffer: the near plane maps to 1.0 and the far plane to 0.0,
//! which keeps precision for the far starfield shell.

pub struct DepthBuffer {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl DepthBuffer {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Reverse-Z clear value: 0.0 is the far plane.
    pub const CLEAR_VALUE: f32 = 0.0;

    /// Closer fragments have higher depth values.
    pub const COMPARE_FUNCTION: wgpu::CompareFunction = wgpu::CompareFunction::GreaterEqual;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-buffer"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Recreate at a new size. No-op if the size is unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width.max(1) && self.height == height.max(1) {
            return;
        }
        *self = Self::new(device, width, height);
    }

    /// Depth-stencil state for pipelines drawing against this buffer.
    pub fn stencil_state(depth_write_enabled: bool) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: Self::FORMAT,
            depth_write_enabled,
            depth_compare: Self::COMPARE_FUNCTION,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_device::try_device;

    #[test]
    fn test_reverse_z_constants() {
        assert_eq!(DepthBuffer::FORMAT, wgpu::TextureFormat::Depth32Float);
        assert_eq!(DepthBuffer::CLEAR_VALUE, 0.0);
        assert_eq!(
            DepthBuffer::COMPARE_FUNCTION,
            wgpu::CompareFunction::GreaterEqual
        );
    }

    #[test]
    fn test_stencil_state_follows_write_flag() {
        assert!(DepthBuffer::stencil_state(true).depth_write_enabled);
        let state = DepthBuffer::stencil_state(false);
        assert!(!state.depth_write_enabled);
        assert_eq!(state.depth_compare, wgpu::CompareFunction::GreaterEqual);
    }

    #[test]
    fn test_resize_updates_dimensions() {
        let Some((device, _queue)) = try_device() else {
            return;
        };
        let mut depth = DepthBuffer::new(&device, 800, 600);
        depth.resize(&device, 1920, 1080);
        assert_eq!((depth.width(), depth.height()), (1920, 1080));
    }

    #[test]
    fn test_zero_size_clamped() {
        let Some((device, _queue)) = try_device() else {
            return;
        };
        let depth = DepthBuffer::new(&device, 0, 0);
        assert_eq!((depth.width(), depth.height()), (1, 1));
        assert!(
            depth
                .texture
                .usage()
                .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
        );
    }
}
