//! 3D transformation matrices and view rotation state

use nalgebra::{Matrix4, Point3, Unit, Vector3};

/// Column-major homogeneous transform
pub type Mat4 = Matrix4<f32>;
/// Position, normal or direction in 3D
pub type Vec3 = Vector3<f32>;

/// Viewer rotation around the three world axes, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewAngles {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl ViewAngles {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in degrees), wrapping each axis at a full turn
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x = (self.x + dx) % 360.0;
        self.y = (self.y + dy) % 360.0;
        self.z = (self.z + dz) % 360.0;
    }

    /// World orientation applied before anything in the room is placed
    pub fn matrix(&self) -> Mat4 {
        rotation(self.x, 1.0, 0.0, 0.0)
            * rotation(self.y, 0.0, 1.0, 0.0)
            * rotation(self.z, 0.0, 0.0, 1.0)
    }
}

impl Default for ViewAngles {
    fn default() -> Self {
        Self::zero()
    }
}

/// Create a translation matrix
pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}

/// Create a rotation of `degrees` around the axis `(x, y, z)`.
///
/// The axis does not need to be unit length. A zero axis yields the identity.
pub fn rotation(degrees: f32, x: f32, y: f32, z: f32) -> Mat4 {
    match Unit::try_new(Vector3::new(x, y, z), f32::EPSILON) {
        Some(axis) => Matrix4::from_axis_angle(&axis, degrees.to_radians()),
        None => Matrix4::identity(),
    }
}

/// Create a scale matrix
pub fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4 {
    Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
}

/// Matrix that carries surface normals through `model`: the transpose of its inverse.
///
/// Returns `None` for a singular model matrix (e.g. a zero scale).
pub fn normal_matrix(model: &Mat4) -> Option<Mat4> {
    model.try_inverse().map(|inverse| inverse.transpose())
}

/// Unit-length projection of `v`; `None` for the zero vector
pub fn normalize(v: &Vec3) -> Option<Vec3> {
    v.try_normalize(f32::EPSILON)
}

/// Transform a point (w = 1) by `m`
pub fn transform_point(m: &Mat4, p: &Vec3) -> Vec3 {
    m.transform_point(&Point3::from(*p)).coords
}

/// Transform a direction (w = 0) by the upper 3x3 block of `m`.
///
/// Works for normal matrices too, whose last row is not `(0, 0, 0, 1)`.
pub fn transform_vector(m: &Mat4, v: &Vec3) -> Vec3 {
    m.fixed_view::<3, 3>(0, 0) * v
}

/// Create a model-view-projection matrix
pub fn mvp_matrix(model: &Mat4, view: &Mat4, projection: &Mat4) -> Mat4 {
    projection * view * model
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_view_angles_wrap() {
        let mut angles = ViewAngles::zero();
        angles.rotate(3.0, -3.0, 0.0);
        assert_eq!(angles, ViewAngles::new(3.0, -3.0, 0.0));

        angles.rotate(357.0, -357.0, 0.0);
        assert_eq!(angles.x, 0.0);
        assert_eq!(angles.y, 0.0);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = ViewAngles::zero().matrix();
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_about_z() {
        let m = rotation(90.0, 0.0, 0.0, 2.0);
        let p = transform_point(&m, &Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_zero_axis_is_identity() {
        assert_eq!(rotation(45.0, 0.0, 0.0, 0.0), Mat4::identity());
    }

    #[test]
    fn test_normal_matrix_undoes_scale() {
        let model = scaling(2.0, 1.0, 1.0);
        let normal = normal_matrix(&model).unwrap();
        let n = transform_vector(&normal, &Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(n, Vec3::new(0.5, 0.0, 0.0), epsilon = 1e-6);

        assert!(normal_matrix(&scaling(0.0, 1.0, 1.0)).is_none());
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert!(normalize(&Vec3::zeros()).is_none());
        let n = normalize(&Vec3::new(0.0, 3.0, 4.0)).unwrap();
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-6);
    }
}
