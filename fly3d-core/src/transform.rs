/// 3D transformation matrices and rotation state
///
/// Every matrix here acts on column vectors and is indexed `m[(row, col)]`. Products
/// compose right to left: in `a * b`, `b` is applied first.
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::error::TransformError;
use crate::vector::{self, NORMALIZE_EPSILON};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
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

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix4<f32> {
        Matrix4::identity()
    }

    /// `a * b`: not commutative, `b` applies first
    pub fn multiply(a: &Matrix4<f32>, b: &Matrix4<f32>) -> Matrix4<f32> {
        a * b
    }

    pub fn multiply_vector(m: &Matrix4<f32>, v: &Vector4<f32>) -> Vector4<f32> {
        m * v
    }

    /// Create a scale matrix
    pub fn scale(s: &Vector3<f32>) -> Matrix4<f32> {
        #[rustfmt::skip]
        let m = Matrix4::new(
            s.x, 0.0, 0.0, 0.0,
            0.0, s.y, 0.0, 0.0,
            0.0, 0.0, s.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    /// Create a translation matrix
    pub fn translate(t: &Vector3<f32>) -> Matrix4<f32> {
        #[rustfmt::skip]
        let m = Matrix4::new(
            1.0, 0.0, 0.0, t.x,
            0.0, 1.0, 0.0, t.y,
            0.0, 0.0, 1.0, t.z,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    pub fn rotate_x(theta: f32) -> Matrix4<f32> {
        let (s, c) = theta.sin_cos();
        #[rustfmt::skip]
        let m = Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0,   c,  -s, 0.0,
            0.0,   s,   c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    pub fn rotate_y(theta: f32) -> Matrix4<f32> {
        let (s, c) = theta.sin_cos();
        #[rustfmt::skip]
        let m = Matrix4::new(
              c, 0.0,   s, 0.0,
            0.0, 1.0, 0.0, 0.0,
             -s, 0.0,   c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    pub fn rotate_z(theta: f32) -> Matrix4<f32> {
        let (s, c) = theta.sin_cos();
        #[rustfmt::skip]
        let m = Matrix4::new(
              c,  -s, 0.0, 0.0,
              s,   c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Self::rotate_x(rotation.x);
        let ry = Self::rotate_y(rotation.y);
        let rz = Self::rotate_z(rotation.z);

        // Apply rotations in order: X, then Y, then Z
        rz * ry * rx
    }

    /// Perspective projection for a view space looking down `+Z`.
    ///
    /// With `f = 1 / tan(fov / 2)` and `q = far / (far - near)`, clip `w` is the view
    /// depth and clip `z` is `q * (z - near)`, so depth lands in `[0, 1]` after the
    /// divide rather than OpenGL's `[-1, 1]`.
    pub fn perspective(
        aspect_ratio: f32,
        fov_y: f32,
        z_near: f32,
        z_far: f32,
    ) -> Result<Matrix4<f32>, TransformError> {
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Err(TransformError::InvalidAspectRatio(aspect_ratio));
        }
        if !(fov_y > 0.0 && fov_y < std::f32::consts::PI) {
            return Err(TransformError::InvalidFieldOfView(fov_y));
        }
        if !(z_near > 0.0 && z_far > z_near && z_far.is_finite()) {
            return Err(TransformError::InvalidDepthRange {
                near: z_near,
                far: z_far,
            });
        }

        let f = 1.0 / (fov_y / 2.0).tan();
        let q = z_far / (z_far - z_near);

        #[rustfmt::skip]
        let m = Matrix4::new(
            f / aspect_ratio, 0.0, 0.0,          0.0,
            0.0,              f,   0.0,          0.0,
            0.0,              0.0, q,   -z_near * q,
            0.0,              0.0, 1.0,          0.0,
        );
        Ok(m)
    }

    /// Camera-to-world frame looking from `position` towards `target`.
    ///
    /// Gram-Schmidt: `up` loses its component along forward before normalizing, and
    /// right is `forward x up`. The 3x3 block holds right/up/forward as columns and the
    /// last column holds `position`.
    pub fn point_at(
        position: &Point3<f32>,
        target: &Point3<f32>,
        up: &Vector3<f32>,
    ) -> Result<Matrix4<f32>, TransformError> {
        let forward = (target - position)
            .try_normalize(NORMALIZE_EPSILON)
            .ok_or(TransformError::DegenerateForward)?;

        let along = vector::scale(&forward, vector::dot(up, &forward));
        let new_up = vector::sub(up, &along)
            .try_normalize(NORMALIZE_EPSILON)
            .ok_or(TransformError::DegenerateUp)?;
        let right = vector::cross(&forward, &new_up);

        let (r, u, f, p) = (right, new_up, forward, position);
        #[rustfmt::skip]
        let m = Matrix4::new(
            r.x, u.x, f.x, p.x,
            r.y, u.y, f.y, p.y,
            r.z, u.z, f.z, p.z,
            0.0, 0.0, 0.0, 1.0,
        );
        Ok(m)
    }

    /// Invert a [`Transform::point_at`] frame into a view matrix.
    ///
    /// Only valid for orthonormal frames: the rotation block is transposed and the
    /// translation becomes `-dot(position, axis)` per axis.
    pub fn view_from_point_at(point_at: &Matrix4<f32>) -> Matrix4<f32> {
        let axis = |col: usize| {
            Vector3::new(point_at[(0, col)], point_at[(1, col)], point_at[(2, col)])
        };
        let (r, u, f, p) = (axis(0), axis(1), axis(2), axis(3));

        #[rustfmt::skip]
        let m = Matrix4::new(
            r.x, r.y, r.z, -vector::dot(&p, &r),
            u.x, u.y, u.z, -vector::dot(&p, &u),
            f.x, f.y, f.z, -vector::dot(&p, &f),
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    /// View matrix for a camera at `position` looking at `target`
    pub fn look_at(
        position: &Point3<f32>,
        target: &Point3<f32>,
        up: &Vector3<f32>,
    ) -> Result<Matrix4<f32>, TransformError> {
        Self::point_at(position, target, up).map(|m| Self::view_from_point_at(&m))
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}
