/// Vector math on top of nalgebra's fixed-size vectors
///
/// The free functions mirror the small vocabulary the rest of the core is written in.
/// They are thin, but they pin two conventions: `cross` is right-handed and
/// `normalize` never divides by zero.
use nalgebra::SVector;

pub use nalgebra::{Vector2, Vector3, Vector4};

/// Vectors shorter than this normalize to zero
pub const NORMALIZE_EPSILON: f32 = f32::EPSILON;

pub fn add<const D: usize>(a: &SVector<f32, D>, b: &SVector<f32, D>) -> SVector<f32, D> {
    a + b
}

pub fn sub<const D: usize>(a: &SVector<f32, D>, b: &SVector<f32, D>) -> SVector<f32, D> {
    a - b
}

pub fn scale<const D: usize>(v: &SVector<f32, D>, k: f32) -> SVector<f32, D> {
    v * k
}

pub fn dot<const D: usize>(a: &SVector<f32, D>, b: &SVector<f32, D>) -> f32 {
    a.dot(b)
}

/// Right-handed cross product: `cross(x, y) == z`
pub fn cross(a: &Vector3<f32>, b: &Vector3<f32>) -> Vector3<f32> {
    a.cross(b)
}

pub fn length<const D: usize>(v: &SVector<f32, D>) -> f32 {
    v.norm()
}

/// Scale `v` to unit length.
///
/// A vector shorter than [`NORMALIZE_EPSILON`] has no direction; the zero vector is
/// returned instead of NaNs. Callers that rely on a unit result must check for it.
pub fn normalize<const D: usize>(v: &SVector<f32, D>) -> SVector<f32, D> {
    v.try_normalize(NORMALIZE_EPSILON)
        .unwrap_or_else(SVector::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_length() {
        let samples = [
            Vector3::new(3.0, 4.0, 0.0),
            Vector3::new(-1.0, 2.0, -3.0),
            Vector3::new(1e-3, 0.0, 2e-3),
            Vector3::new(1e4, -2e4, 5e3),
        ];
        for v in samples {
            assert!((length(&normalize(&v)) - 1.0).abs() < 1e-6);
        }

        let v4 = Vector4::new(1.0, 1.0, 1.0, 1.0);
        assert!((length(&normalize(&v4)) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let n = normalize(&Vector3::<f32>::zeros());
        assert_eq!(n, Vector3::zeros());
        assert!(!n.x.is_nan());

        let tiny = Vector2::new(1e-9_f32, 0.0);
        assert_eq!(normalize(&tiny), Vector2::zeros());
    }

    #[test]
    fn test_cross_is_right_handed() {
        let x = Vector3::x();
        let y = Vector3::y();
        assert!((cross(&x, &y) - Vector3::z()).norm() < 1e-6);
        assert!((cross(&y, &x) + Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_arithmetic() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        assert_eq!(add(&a, &b), Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(sub(&b, &a), Vector3::new(3.0, 3.0, 3.0));
        assert_eq!(scale(&a, 2.0), Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(dot(&a, &b), 32.0);
        assert_eq!(length(&Vector3::new(2.0, 3.0, 6.0)), 7.0);
    }
}
