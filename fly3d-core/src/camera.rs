/// First-person camera driven by yaw and pitch
use std::f32::consts::FRAC_PI_2;

use bitflags::bitflags;
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::TransformError;
use crate::transform::Transform;
use crate::vector;

/// Keeps pitch strictly inside (-pi/2, pi/2)
pub const PITCH_MARGIN: f32 = 0.001;

pub const MAX_PITCH: f32 = FRAC_PI_2 - PITCH_MARGIN;

bitflags! {
    /// Movement requested for one update; opposing flags cancel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Movement: u8 {
        const FORWARD = 0x01;
        const BACKWARD = 0x02;
        const LEFT = 0x04;
        const RIGHT = 0x08;
    }
}

/// Speed constants applied to camera input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// World units per second
    pub move_speed: f32,
    /// Radians per second of held turn input
    pub turn_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            move_speed: 2.5,
            turn_speed: 1.5,
        }
    }
}

/// Unit view direction for the given angles; yaw = pitch = 0 looks down +X
pub fn front_direction(yaw: f32, pitch: f32) -> Vector3<f32> {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    vector::normalize(&Vector3::new(
        cos_yaw * cos_pitch,
        sin_pitch,
        sin_yaw * cos_pitch,
    ))
}

/// Camera position and orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    yaw: f32,
    pitch: f32,
}

/// Fixed up direction of the world
pub fn world_up() -> Vector3<f32> {
    Vector3::y()
}

impl Camera {
    pub fn new(position: Point3<f32>, yaw: f32, pitch: f32) -> Self {
        let clamped = pitch.clamp(-MAX_PITCH, MAX_PITCH);
        if clamped != pitch {
            log::warn!("initial camera pitch {pitch} clamped to {clamped}");
        }
        Self {
            position,
            yaw,
            pitch: clamped,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn front(&self) -> Vector3<f32> {
        front_direction(self.yaw, self.pitch)
    }

    /// Horizontal right vector, `front x world_up`
    pub fn right(&self) -> Vector3<f32> {
        vector::normalize(&vector::cross(&self.front(), &world_up()))
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Result<Matrix4<f32>, TransformError> {
        let target = self.position + self.front();
        Transform::look_at(&self.position, &target, &world_up())
    }

    /// Move along the flags in `movement` for `dt` seconds at `speed` units per second
    pub fn move_along(&mut self, movement: Movement, speed: f32, dt: f32) {
        let front = self.front();
        let right = self.right();

        // Sum the directions before scaling so opposing flags cancel to exactly zero
        let mut direction = Vector3::zeros();
        if movement.contains(Movement::FORWARD) {
            direction += front;
        }
        if movement.contains(Movement::BACKWARD) {
            direction -= front;
        }
        if movement.contains(Movement::RIGHT) {
            direction += right;
        }
        if movement.contains(Movement::LEFT) {
            direction -= right;
        }

        self.position += direction * (speed * dt);
    }

    /// Add to yaw (unbounded) and pitch (clamped short of straight up or down)
    pub fn turn(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Point3::origin(), 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn close(a: &Vector3<f32>, b: &Vector3<f32>) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn test_front_direction() {
        assert!(close(&front_direction(0.0, 0.0), &Vector3::new(1.0, 0.0, 0.0)));
        assert!(close(&front_direction(FRAC_PI_2, 0.0), &Vector3::new(0.0, 0.0, 1.0)));

        let up = front_direction(0.3, 1.0);
        assert!((up.norm() - 1.0).abs() < 1e-6);
        assert!((up.y - 1.0_f32.sin()).abs() < 1e-6);
    }

    #[test]
    fn test_pitch_stays_inside_limits() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.turn(0.1, 10.0);
            assert!(camera.pitch() < FRAC_PI_2);
        }
        assert_eq!(camera.pitch(), MAX_PITCH);

        for _ in 0..100 {
            camera.turn(-0.1, -1e6);
            assert!(camera.pitch() > -FRAC_PI_2);
        }
        assert_eq!(camera.pitch(), -MAX_PITCH);
        assert!(camera.view_matrix().is_ok());
    }

    #[test]
    fn test_new_clamps_pitch() {
        let camera = Camera::new(Point3::origin(), 0.0, PI);
        assert_eq!(camera.pitch(), MAX_PITCH);
    }

    #[test]
    fn test_yaw_is_unbounded() {
        let mut camera = Camera::default();
        camera.turn(4.0 * PI + FRAC_PI_2, 0.0);
        assert!((camera.yaw() - (4.0 * PI + FRAC_PI_2)).abs() < 1e-5);
        assert!(close(&camera.front(), &Vector3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_opposing_movement_cancels() {
        let start = Point3::new(1.0, 2.0, 3.0);
        let mut camera = Camera::new(start, 0.7, -0.2);

        camera.move_along(Movement::FORWARD | Movement::BACKWARD, 3.0, 0.25);
        assert_eq!(camera.position, start);

        camera.move_along(Movement::LEFT | Movement::RIGHT, 3.0, 0.25);
        assert_eq!(camera.position, start);

        camera.move_along(Movement::all(), 3.0, 0.25);
        assert_eq!(camera.position, start);
    }

    #[test]
    fn test_move_directions() {
        let mut camera = Camera::default();
        camera.move_along(Movement::FORWARD, 2.0, 0.5);
        assert!(close(&camera.position.coords, &Vector3::new(1.0, 0.0, 0.0)));

        let mut camera = Camera::default();
        camera.move_along(Movement::RIGHT, 2.0, 0.5);
        assert!(close(&camera.position.coords, &Vector3::new(0.0, 0.0, 1.0)));

        let mut camera = Camera::default();
        camera.move_along(Movement::BACKWARD | Movement::LEFT, 1.0, 1.0);
        assert!(close(&camera.position.coords, &Vector3::new(-1.0, 0.0, -1.0)));
    }

    #[test]
    fn test_movement_from_raw_byte() {
        let movement = Movement::from_bits_truncate(0x01 | 0x08 | 0xF0);
        assert_eq!(movement, Movement::FORWARD | Movement::RIGHT);
        assert_eq!(Movement::LEFT.bits(), 0x04);
    }

    #[test]
    fn test_view_matrix_centres_camera() {
        let camera = Camera::new(Point3::new(2.0, 1.0, -3.0), 1.2, 0.4);
        let view = camera.view_matrix().unwrap();

        let eye = view * camera.position.to_homogeneous();
        assert!(eye.xyz().norm() < 1e-5);

        let ahead = view * (camera.position + camera.front()).to_homogeneous();
        assert!(close(&ahead.xyz(), &Vector3::new(0.0, 0.0, 1.0)));

        let right = view * (camera.position + camera.right()).to_homogeneous();
        assert!(close(&right.xyz(), &Vector3::new(1.0, 0.0, 0.0)));
    }
}
