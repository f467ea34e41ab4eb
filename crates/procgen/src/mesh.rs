//! Grid mesh assembly: triangle indices, planar UVs, normals and bounds.

use std::io::{self, Write};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::heightfield::HeightField;

/// Interleaved vertex for host GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Axis-aligned bounding box in mesh-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(&first) = points.first() else {
            return Self {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            };
        };
        points.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |b, &p| Self {
                min: b.min.min(p),
                max: b.max.max(p),
            },
        )
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Whether `(x, z)` lies inside the box footprint grown by `margin`.
    pub fn contains_xz(&self, x: f32, z: f32, margin: f32) -> bool {
        x >= self.min.x - margin
            && x <= self.max.x + margin
            && z >= self.min.z - margin
            && z <= self.max.z + margin
    }
}

/// Two triangles per cell over a `(width+1) × (depth+1)` vertex grid.
pub fn build_triangles(width: u32, depth: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity(width as usize * depth as usize * 6);
    let row = width + 1;
    for z in 0..depth {
        for x in 0..width {
            let v = z * row + x;
            indices.extend([v, v + row, v + 1]);
            indices.extend([v + 1, v + row, v + row + 1]);
        }
    }
    indices
}

/// Planar projection: `uv = (x, z)` in mesh units, not normalized to `[0, 1]`.
pub fn build_uvs(vertices: &[Vec3]) -> Vec<Vec2> {
    vertices.iter().map(|v| Vec2::new(v.x, v.z)).collect()
}

/// Renderable and collidable data for one chunk.
///
/// Normals and bounds are derived from vertices and indices; call
/// [`MeshRecord::recalculate`] after moving vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRecord {
    width: u32,
    depth: u32,
    vertices: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
    normals: Vec<Vec3>,
    bounds: Aabb,
}

impl MeshRecord {
    /// Triangulate a height field into a finished mesh.
    pub fn assemble(field: HeightField) -> Self {
        debug_assert_eq!(
            field.vertices.len(),
            (field.width as usize + 1) * (field.depth as usize + 1)
        );
        let indices = build_triangles(field.width, field.depth);
        let uvs = build_uvs(&field.vertices);
        let mut mesh = Self {
            width: field.width,
            depth: field.depth,
            normals: vec![Vec3::Y; field.vertices.len()],
            bounds: Aabb::from_points(&field.vertices),
            vertices: field.vertices,
            uvs,
            indices,
        };
        mesh.recalculate();
        mesh
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Mutable vertex access. Callers must [`recalculate`](Self::recalculate) afterwards.
    pub(crate) fn vertices_mut(&mut self) -> &mut [Vec3] {
        &mut self.vertices
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangles as index triples, for collision builders.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect()
    }

    /// Recompute normals and bounds from the current vertices.
    pub fn recalculate(&mut self) {
        self.recalculate_normals();
        self.bounds = Aabb::from_points(&self.vertices);
    }

    fn recalculate_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];

        // Unnormalized face normals weight each triangle by its area.
        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let v0 = self.vertices[i0];
            let v1 = self.vertices[i1];
            let v2 = self.vertices[i2];
            let n = (v1 - v0).cross(v2 - v0);
            normals[i0] += n;
            normals[i1] += n;
            normals[i2] += n;
        }

        for n in &mut normals {
            *n = n.try_normalize().unwrap_or(Vec3::Y);
        }
        self.normals = normals;
    }

    /// Interleaved position/normal/uv buffer.
    pub fn interleaved(&self) -> Vec<TerrainVertex> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| TerrainVertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }

    /// Write the mesh as a Wavefront OBJ object named `name`, in mesh-local space.
    pub fn write_obj<W: Write>(&self, out: &mut W, name: &str) -> io::Result<()> {
        writeln!(out, "o {name}")?;
        for v in &self.vertices {
            writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for uv in &self.uvs {
            writeln!(out, "vt {} {}", uv.x, uv.y)?;
        }
        for n in &self.normals {
            writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
        }
        for tri in self.indices.chunks_exact(3) {
            // OBJ indices are 1-based.
            let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
            writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        }
        Ok(())
    }
}
