/// Geometry primitives for 3D rendering
use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use nalgebra::{Point3, Vector2, Vector3};

use crate::error::MeshError;
use crate::vector;

/// A vertex as laid out in a vertex buffer: position | normal | texture coordinate
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// One vertex attribute as a rendering backend binds it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub offset: usize,
    pub components: usize,
}

impl Vertex {
    pub const STRIDE: usize = size_of::<Vertex>();

    pub const ATTRIBUTES: [VertexAttribute; 3] = [
        VertexAttribute {
            location: 0,
            offset: offset_of!(Vertex, position),
            components: 3,
        },
        VertexAttribute {
            location: 1,
            offset: offset_of!(Vertex, normal),
            components: 3,
        },
        VertexAttribute {
            location: 2,
            offset: offset_of!(Vertex, tex_coord),
            components: 2,
        },
    ];

    pub fn new(position: Point3<f32>, normal: Vector3<f32>, tex_coord: Vector2<f32>) -> Self {
        Self {
            position: position.coords.into(),
            normal: normal.into(),
            tex_coord: tex_coord.into(),
        }
    }

    pub fn position(&self) -> Point3<f32> {
        Point3::from(self.position)
    }

    pub fn normal(&self) -> Vector3<f32> {
        Vector3::from(self.normal)
    }

    pub fn tex_coord(&self) -> Vector2<f32> {
        Vector2::from(self.tex_coord)
    }
}

/// Flat normal of a counter-clockwise triangle; zero for a degenerate one
pub fn face_normal(p0: &Point3<f32>, p1: &Point3<f32>, p2: &Point3<f32>) -> Vector3<f32> {
    let edge1 = p1 - p0;
    let edge2 = p2 - p0;
    vector::normalize(&vector::cross(&edge1, &edge2))
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = &self.vertices;
        face_normal(&v0.position(), &v1.position(), &v2.position())
    }
}

/// What a texture is sampled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
}

impl TextureKind {
    /// Sampler names the shaders declare for this kind, in binding order
    pub fn slot_names(self) -> &'static [&'static str] {
        match self {
            TextureKind::Diffuse => &["diffuse1", "diffuse2", "diffuse3"],
            TextureKind::Specular => &["specular1", "specular2"],
        }
    }
}

/// A texture owned by the rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRef {
    pub id: u32,
    pub kind: TextureKind,
}

impl TextureRef {
    pub fn new(id: u32, kind: TextureKind) -> Self {
        Self { id, kind }
    }
}

/// Where a backend should bind one texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSlot {
    pub unit: u32,
    pub name: &'static str,
    pub texture: TextureRef,
}

/// A 3D mesh: a vertex buffer, an optional index buffer and the textures it samples
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Option<Vec<u32>>,
    textures: Vec<TextureRef>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: None,
            textures: Vec::new(),
        }
    }

    /// Mesh whose triangles are given by `indices` into shared `vertices`
    pub fn indexed(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        textures: Vec<TextureRef>,
    ) -> Result<Self, MeshError> {
        if !indices.len().is_multiple_of(3) {
            return Err(MeshError::NotTriangulated { len: indices.len() });
        }
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertices.len())
        {
            return Err(MeshError::IndexOutOfBounds {
                position,
                index,
                len: vertices.len(),
            });
        }

        log::debug!(
            "indexed mesh: {} vertices, {} triangles",
            vertices.len(),
            indices.len() / 3
        );
        Ok(Self {
            vertices,
            indices: Some(indices),
            textures,
        })
    }

    /// Mesh whose vertices are consecutive triangle corners
    pub fn unindexed(vertices: Vec<Vertex>, textures: Vec<TextureRef>) -> Result<Self, MeshError> {
        if !vertices.len().is_multiple_of(3) {
            return Err(MeshError::NotTriangulated {
                len: vertices.len(),
            });
        }

        log::debug!("unindexed mesh: {} triangles", vertices.len() / 3);
        Ok(Self {
            vertices,
            indices: None,
            textures,
        })
    }

    /// Unindexed mesh from corners the caller has already grouped in threes
    pub(crate) fn from_corners(vertices: Vec<Vertex>) -> Self {
        debug_assert_eq!(vertices.len() % 3, 0);
        Self {
            vertices,
            indices: None,
            textures: Vec::new(),
        }
    }

    pub fn with_textures(mut self, textures: Vec<TextureRef>) -> Self {
        self.textures = textures;
        self
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn textures(&self) -> &[TextureRef] {
        &self.textures
    }

    /// Vertex buffer contents, `Vertex::STRIDE` bytes per vertex
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> Option<&[u8]> {
        self.indices.as_deref().map(bytemuck::cast_slice)
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertices.len() / 3,
        }
    }

    /// Every triangle in draw order, resolved through the index buffer if there is one
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).map(move |t| {
            let corner = |k: usize| match &self.indices {
                Some(indices) => self.vertices[indices[t * 3 + k] as usize],
                None => self.vertices[t * 3 + k],
            };
            Triangle::new(corner(0), corner(1), corner(2))
        })
    }

    /// Texture units and sampler names in list order.
    ///
    /// Unit `i` is the `i`-th texture; names count up per kind.
    pub fn texture_slots(&self) -> Result<Vec<TextureSlot>, MeshError> {
        let mut diffuse = 0;
        let mut specular = 0;

        self.textures
            .iter()
            .enumerate()
            .map(|(unit, &texture)| {
                let count = match texture.kind {
                    TextureKind::Diffuse => &mut diffuse,
                    TextureKind::Specular => &mut specular,
                };
                let names = texture.kind.slot_names();
                let name = *names.get(*count).ok_or(MeshError::TooManyTextures {
                    kind: texture.kind,
                    max: names.len(),
                })?;
                *count += 1;

                Ok(TextureSlot {
                    unit: unit as u32,
                    name,
                    texture,
                })
            })
            .collect()
    }

    /// Create a cube mesh centred on the origin with one flat normal per face
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;

        // (normal, u axis, v axis) per face; u x v == normal keeps winding counter-clockwise
        let faces = [
            (Vector3::z(), Vector3::x(), Vector3::y()),
            (-Vector3::z(), -Vector3::x(), Vector3::y()),
            (Vector3::y(), Vector3::x(), -Vector3::z()),
            (-Vector3::y(), Vector3::x(), Vector3::z()),
            (Vector3::x(), -Vector3::z(), Vector3::y()),
            (-Vector3::x(), Vector3::z(), Vector3::y()),
        ];
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u32;
            for (a, b) in corners {
                let position = Point3::from((normal + u * a + v * b) * half);
                let tex_coord = Vector2::new((a + 1.0) / 2.0, (b + 1.0) / 2.0);
                vertices.push(Vertex::new(position, normal, tex_coord));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            vertices,
            indices: Some(indices),
            textures: Vec::new(),
        }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new(Point3::new(x, y, z), Vector3::z(), Vector2::zeros())
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(Vertex::STRIDE, 32);
        let offsets: Vec<_> = Vertex::ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        let locations: Vec<_> = Vertex::ATTRIBUTES.iter().map(|a| a.location).collect();
        assert_eq!(locations, vec![0, 1, 2]);
    }

    #[test]
    fn test_vertex_bytes() {
        let v = Vertex::new(
            Point3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector2::new(0.25, 0.75),
        );
        let mesh = Mesh::unindexed(vec![v, v, v], Vec::new()).unwrap();
        let bytes = mesh.vertex_bytes();
        assert_eq!(bytes.len(), 3 * Vertex::STRIDE);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[28..32], &0.75f32.to_ne_bytes());
        assert!(mesh.index_bytes().is_none());
    }

    #[test]
    fn test_calculate_normal() {
        let triangle = Triangle::new(
            vertex(0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0),
            vertex(0.0, 1.0, 0.0),
        );
        assert!((triangle.calculate_normal() - Vector3::z()).norm() < 1e-6);

        let flipped = Triangle::new(
            vertex(0.0, 0.0, 0.0),
            vertex(0.0, 1.0, 0.0),
            vertex(1.0, 0.0, 0.0),
        );
        assert!((flipped.calculate_normal() + Vector3::z()).norm() < 1e-6);

        let line = Triangle::new(
            vertex(0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0),
            vertex(2.0, 0.0, 0.0),
        );
        assert_eq!(line.calculate_normal(), Vector3::zeros());
    }

    #[test]
    fn test_indexed_validates_indices() {
        let vertices = vec![vertex(0.0, 0.0, 0.0), vertex(1.0, 0.0, 0.0), vertex(0.0, 1.0, 0.0)];

        let mesh = Mesh::indexed(vertices.clone(), vec![0, 1, 2], Vec::new()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.index_bytes().map(<[u8]>::len), Some(12));

        assert_eq!(
            Mesh::indexed(vertices.clone(), vec![0, 1, 3], Vec::new()),
            Err(MeshError::IndexOutOfBounds {
                position: 2,
                index: 3,
                len: 3
            })
        );
        assert_eq!(
            Mesh::indexed(vertices, vec![0, 1], Vec::new()),
            Err(MeshError::NotTriangulated { len: 2 })
        );
    }

    #[test]
    fn test_unindexed_requires_whole_triangles() {
        let v = vertex(0.0, 0.0, 0.0);
        assert_eq!(
            Mesh::unindexed(vec![v; 4], Vec::new()),
            Err(MeshError::NotTriangulated { len: 4 })
        );
        assert_eq!(Mesh::unindexed(vec![v; 6], Vec::new()).unwrap().triangle_count(), 2);
        assert_eq!(Mesh::default().triangles().count(), 0);
    }

    #[test]
    fn test_triangles_resolve_indices() {
        let vertices = vec![
            vertex(0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0),
            vertex(1.0, 1.0, 0.0),
            vertex(0.0, 1.0, 0.0),
        ];
        let mesh = Mesh::indexed(vertices.clone(), vec![0, 1, 2, 0, 2, 3], Vec::new()).unwrap();
        let triangles: Vec<_> = mesh.triangles().collect();
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[1].vertices, [vertices[0], vertices[2], vertices[3]]);
    }

    #[test]
    fn test_texture_slots() {
        let mesh = Mesh::new().with_textures(vec![
            TextureRef::new(7, TextureKind::Diffuse),
            TextureRef::new(9, TextureKind::Specular),
            TextureRef::new(8, TextureKind::Diffuse),
        ]);
        let slots = mesh.texture_slots().unwrap();
        let plan: Vec<_> = slots.iter().map(|s| (s.unit, s.name, s.texture.id)).collect();
        assert_eq!(plan, vec![(0, "diffuse1", 7), (1, "specular1", 9), (2, "diffuse2", 8)]);
    }

    #[test]
    fn test_too_many_textures() {
        let mesh = Mesh::new().with_textures(vec![TextureRef::new(1, TextureKind::Specular); 3]);
        assert_eq!(
            mesh.texture_slots(),
            Err(MeshError::TooManyTextures {
                kind: TextureKind::Specular,
                max: 2
            })
        );
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.vertices().len(), 24);
        assert_eq!(cube.triangle_count(), 12);

        for triangle in cube.triangles() {
            let stored = triangle.vertices[0].normal();
            assert!((triangle.calculate_normal() - stored).norm() < 1e-6);

            // the centroid of an outward face lies along its normal
            let centroid = triangle
                .vertices
                .iter()
                .fold(Vector3::zeros(), |acc, v| acc + v.position().coords)
                / 3.0;
            assert!(centroid.dot(&stored) > 0.0);
        }
    }
}
