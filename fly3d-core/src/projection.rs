/// Perspective projection parameters and screen mapping
use nalgebra::{Matrix4, Point3};

use crate::error::TransformError;
use crate::transform::Transform;

/// Validated perspective parameters
///
/// Construction goes through [`Perspective::new`], so a value of this type always
/// produces a finite projection matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    aspect: f32,
    fov_y: f32,
    z_near: f32,
    z_far: f32,
    matrix: Matrix4<f32>,
}

impl Perspective {
    pub fn new(aspect: f32, fov_y: f32, z_near: f32, z_far: f32) -> Result<Self, TransformError> {
        let matrix = Transform::perspective(aspect, fov_y, z_near, z_far)?;
        Ok(Self {
            aspect,
            fov_y,
            z_near,
            z_far,
            matrix,
        })
    }

    /// Perspective for a viewport of `width` x `height` pixels
    pub fn for_viewport(
        width: u32,
        height: u32,
        fov_y: f32,
        z_near: f32,
        z_far: f32,
    ) -> Result<Self, TransformError> {
        Self::new(width as f32 / height as f32, fov_y, z_near, z_far)
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Change the aspect ratio, e.g. after a resize
    pub fn set_aspect(&mut self, aspect: f32) -> Result<(), TransformError> {
        *self = Self::new(aspect, self.fov_y, self.z_near, self.z_far)?;
        Ok(())
    }

    /// Create the projection matrix
    pub fn matrix(&self) -> Matrix4<f32> {
        self.matrix
    }
}

/// Project a world-space point to screen space through `mvp`.
///
/// Returns `(x, y, depth)` with `x` growing right, `y` growing down and depth in
/// `[0, 1]`, or `None` when the point lies outside the view volume.
pub fn project_to_screen(
    point: &Point3<f32>,
    mvp: &Matrix4<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip = mvp * point.to_homogeneous();

    // Behind the eye or on the eye plane
    if clip.w <= 1e-6 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let depth = clip.z / clip.w;

    // Clip test
    if !(-1.0..=1.0).contains(&ndc_x) || !(-1.0..=1.0).contains(&ndc_y) {
        return None;
    }
    if !(0.0..=1.0).contains(&depth) {
        return None;
    }

    // Convert to screen space
    let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

    Some((screen_x, screen_y, depth))
}
