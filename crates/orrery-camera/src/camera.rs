//! View and projection matrices.

use glam::{Mat3, Mat4, Quat, Vec2, Vec3};

use crate::ray::Ray;

/// A camera that generates view and projection matrices for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Rotation as a unit quaternion. Identity looks down -Z with +Y up.
    pub rotation: Quat,
    pub projection: Projection,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

/// Projection type for the camera.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        /// Width / height.
        aspect_ratio: f32,
    },
    Orthographic {
        half_width: f32,
        half_height: f32,
    },
}

impl Camera {
    /// A camera at `position` facing `target`, with +Y as world up.
    ///
    /// `position` must not lie straight above or below `target`.
    pub fn looking_at(
        position: Vec3,
        target: Vec3,
        projection: Projection,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            rotation: look_rotation(target - position),
            projection,
            near,
            far,
        }
    }

    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Compute the projection matrix with reverse-Z (near maps to 1, far to 0).
    pub fn projection_matrix(&self) -> Mat4 {
        match &self.projection {
            Projection::Perspective {
                fov_y,
                aspect_ratio,
            } => Mat4::perspective_rh(*fov_y, *aspect_ratio, self.far, self.near),
            Projection::Orthographic {
                half_width,
                half_height,
            } => Mat4::orthographic_rh(
                -*half_width,
                *half_width,
                -*half_height,
                *half_height,
                self.far,
                self.near,
            ),
        }
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Update the aspect ratio for perspective projection. Zero-height sizes are ignored.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if height <= 0.0 || width <= 0.0 {
            return;
        }
        if let Projection::Perspective { aspect_ratio, .. } = &mut self.projection {
            *aspect_ratio = width / height;
        }
    }

    /// World-space ray through a point in normalized device coordinates.
    ///
    /// `ndc` is in `[-1, 1]` on both axes with +Y up.
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection_matrix().inverse();
        // Reverse-Z: z = 1 is the near plane, z = 0 the far plane.
        let near = inverse.project_point3(ndc.extend(1.0));
        let far = inverse.project_point3(ndc.extend(0.0));
        Ray::new(near, far - near)
    }

    /// Project a world point to NDC. `None` when the point is behind the camera.
    pub fn world_to_ndc(&self, point: Vec3) -> Option<Vec3> {
        let clip = self.view_projection_matrix() * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            projection: Projection::Perspective {
                fov_y: 75.0_f32.to_radians(),
                aspect_ratio: 16.0 / 9.0,
            },
            near: 0.1,
            far: 2000.0,
        }
    }
}

/// Rotation whose -Z axis points along `direction`, keeping +Y as up.
fn look_rotation(direction: Vec3) -> Quat {
    let forward = direction.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let right = forward.cross(Vec3::Y).normalize_or_zero();
    if right == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let up = right.cross(forward);
    Quat::from_mat3(&Mat3::from_cols(right, up, -forward))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_identity_camera_looks_down_neg_z() {
        assert_vec_close(Camera::default().forward(), Vec3::NEG_Z);
    }

    #[test]
    fn test_looking_at_faces_target() {
        let camera = Camera::looking_at(
            Vec3::new(10.0, 5.0, -3.0),
            Vec3::ZERO,
            Camera::default().projection,
            0.1,
            2000.0,
        );
        let expected = (Vec3::ZERO - camera.position).normalize();
        assert_vec_close(camera.forward(), expected);
        assert!(camera.up().y > 0.0);
        assert!(camera.right().y.abs() < 1e-5);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = Camera::looking_at(
            Vec3::new(3.0, 20.0, 7.0),
            Vec3::ZERO,
            Camera::default().projection,
            0.1,
            2000.0,
        );
        let (f, u, r) = (camera.forward(), camera.up(), camera.right());
        for v in [f, u, r] {
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
        assert!(f.dot(u).abs() < 1e-5);
        assert!(f.dot(r).abs() < 1e-5);
        assert!(u.dot(r).abs() < 1e-5);
    }

    #[test]
    fn test_view_matrix_inverse_is_camera_transform() {
        let camera = Camera {
            position: Vec3::new(10.0, 20.0, 30.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ..Camera::default()
        };
        let reconstructed = camera.view_matrix().inverse().col(3).truncate();
        assert_vec_close(reconstructed, camera.position);
    }

    #[test]
    fn test_reverse_z_depth_range() {
        let camera = Camera::default();
        let near = camera.world_to_ndc(Vec3::new(0.0, 0.0, -0.1)).unwrap();
        let far = camera.world_to_ndc(Vec3::new(0.0, 0.0, -2000.0)).unwrap();
        assert!((near.z - 1.0).abs() < 1e-4);
        assert!(far.z.abs() < 1e-4);
    }

    #[test]
    fn test_point_behind_camera_has_no_ndc() {
        assert!(Camera::default().world_to_ndc(Vec3::new(0.0, 0.0, 5.0)).is_none());
    }

    #[test]
    fn test_center_ray_follows_forward() {
        let camera = Camera::looking_at(
            Vec3::new(0.0, 10.0, 20.0),
            Vec3::ZERO,
            Camera::default().projection,
            0.1,
            2000.0,
        );
        let ray = camera.ray_through_ndc(Vec2::ZERO);
        assert_vec_close(ray.direction, camera.forward());
        assert!((ray.origin - camera.position).length() < 0.2);
    }

    #[test]
    fn test_ray_round_trips_projection() {
        let camera = Camera::looking_at(
            Vec3::new(5.0, 12.0, 18.0),
            Vec3::ZERO,
            Camera::default().projection,
            0.1,
            2000.0,
        );
        let point = Vec3::new(1.5, -0.5, 2.0);
        let ndc = camera.world_to_ndc(point).unwrap();
        let ray = camera.ray_through_ndc(ndc.truncate());
        let to_point = point - ray.origin;
        let off_axis = to_point - ray.direction * to_point.dot(ray.direction);
        assert!(off_axis.length() < 1e-2, "ray misses point by {}", off_axis.length());
    }

    #[test]
    fn test_aspect_ratio_ignores_zero_height() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        camera.set_aspect_ratio(800.0, 0.0);
        if let Projection::Perspective { aspect_ratio, .. } = camera.projection {
            assert!((aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
        } else {
            panic!("expected perspective projection");
        }
    }
}
