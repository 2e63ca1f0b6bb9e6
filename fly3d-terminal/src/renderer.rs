/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use fly3d_core::projection::project_to_screen;
use fly3d_core::{Mesh, Perspective, Transform, Triangle};
use nalgebra::{Matrix3, Matrix4, Vector3};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light that every lit face receives regardless of orientation
const AMBIENT: f32 = 0.1;

/// Per-frame transforms shared by every triangle of a mesh
pub struct FrameTransforms<'a> {
    pub model: &'a Matrix4<f32>,
    pub view: &'a Matrix4<f32>,
    pub projection: &'a Perspective,
    /// World-space direction the light travels in
    pub light_dir: Vector3<f32>,
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Character at column `x`, row `y`
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, frame: &FrameTransforms<'_>) {
        let mvp = Transform::mvp_matrix(frame.model, frame.view, &frame.projection.matrix());
        let normal_matrix: Matrix3<f32> = frame.model.fixed_view::<3, 3>(0, 0).into_owned();

        for triangle in mesh.triangles() {
            self.render_triangle(&triangle, &mvp, &normal_matrix, frame.light_dir);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        mvp: &Matrix4<f32>,
        normal_matrix: &Matrix3<f32>,
        light_dir: Vector3<f32>,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coord, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match project_to_screen(
                &vertex.position(),
                mvp,
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *coord = projected,
                None => return, // Triangle is clipped
            }
        }

        // Flat shading from the stored face normal
        let normal = (normal_matrix * triangle.vertices[0].normal()).normalize();
        let diffuse = normal.dot(&-light_dir).max(0.0);
        let brightness = (AMBIENT + (1.0 - AMBIENT) * diffuse).min(1.0);

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        self.rasterize_triangle(&screen_coords, character);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                // Interpolate depth
                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
