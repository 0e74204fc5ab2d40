//! WGSL sources for the two pipeline families.
//!
//! Both share the frame uniform at `@group(0) @binding(0)` and the per-instance
//! attributes at locations 2 to 7 (model matrix columns, color, params).

use log::debug;

/// Compile a WGSL module. Validation errors surface through the device's
/// uncaptured error handler.
pub fn compile(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    debug!("Compiling shader '{label}'");
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

const FRAME_AND_INSTANCE: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    point_position_range: vec4<f32>,
    point_color_intensity: vec4<f32>,
    sun_direction: vec4<f32>,
    sun_color_intensity: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) params: vec4<f32>,
};

fn instance_model(instance: InstanceInput) -> mat4x4<f32> {
    return mat4x4<f32>(instance.model_0, instance.model_1, instance.model_2, instance.model_3);
}
"#;

const MESH_BODY: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) lit: f32,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = instance_model(instance);
    let world = model * vec4<f32>(vertex.position, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * world;
    out.world_position = world.xyz;
    out.normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = instance.color;
    out.lit = instance.params.x;
    return out;
}

fn smooth_window(dist: f32, range: f32) -> f32 {
    if dist >= range {
        return 0.0;
    }
    let ratio = dist / range;
    let t = max(1.0 - ratio * ratio, 0.0);
    return t * t;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(in.normal);
    var light = frame.ambient.rgb;

    let to_light = frame.point_position_range.xyz - in.world_position;
    let dist = length(to_light);
    if dist > 0.0 {
        let n_dot_l = max(dot(normal, to_light / dist), 0.0);
        light += n_dot_l * frame.point_color_intensity.rgb * frame.point_color_intensity.w
            * smooth_window(dist, frame.point_position_range.w);
    }

    let sun_n_dot_l = max(dot(normal, -frame.sun_direction.xyz), 0.0);
    light += sun_n_dot_l * frame.sun_color_intensity.rgb * frame.sun_color_intensity.w;

    let rgb = mix(in.color.rgb, in.color.rgb * light, in.lit);
    return vec4<f32>(rgb, in.color.a);
}
"#;

const POINTS_BODY: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = instance_model(instance);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color * instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Lit and unlit instanced meshes.
pub fn mesh_source() -> String {
    format!("{FRAME_AND_INSTANCE}{MESH_BODY}")
}

/// Orbit guides, the starfield and the asteroid field.
pub fn points_source() -> String {
    format!("{FRAME_AND_INSTANCE}{POINTS_BODY}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_device::try_device;

    #[test]
    fn test_sources_declare_entry_points() {
        for source in [mesh_source(), points_source()] {
            assert!(source.contains("fn vs_main"));
            assert!(source.contains("fn fs_main"));
            assert!(source.contains("@group(0) @binding(0)"));
        }
    }

    #[test]
    fn test_sources_compile() {
        let Some((device, _queue)) = try_device() else {
            return;
        };
        compile(&device, "mesh", &mesh_source());
        compile(&device, "points", &points_source());
    }
}
