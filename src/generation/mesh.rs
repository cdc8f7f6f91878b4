//! Tessellation of recipe parts into indexed triangle meshes.
//!
//! The vertex format is shared by the discrete path (one mesh per
//! building) and the instanced path (one unit cube scaled per instance).

use bytemuck::{Pod, Zeroable};

use crate::core::types::{Vec3, Vec4};

use super::recipe::{BuildingGeometry, Part, Shape};

/// Mesh vertex. Must match the vertex input of the building shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// RGB plus emissive strength in alpha
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cube spanning [-0.5, 0.5] in x/z and [0, 1] in y, white
    pub fn unit_cube() -> Self {
        let mut mesh = Self::new();
        mesh.push_box(Vec3::ZERO, Vec3::ONE, Vec4::ONE);
        mesh
    }

    /// Tessellate every part of a building, offset to its world position
    pub fn from_geometry(geometry: &BuildingGeometry, offset: Vec3) -> Self {
        let mut mesh = Self::new();
        for part in &geometry.parts {
            mesh.push_part(part, offset);
        }
        mesh
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn push_part(&mut self, part: &Part, offset: Vec3) {
        let color = part.color.extend(if part.emissive { 1.0 } else { 0.0 });
        let base = part.base + offset;
        match part.shape {
            Shape::Box => self.push_box(base, part.size, color),
            Shape::Pyramid => self.push_pyramid(base, part.size, color),
            Shape::Cylinder { segments } => self.push_cylinder(base, part.size, segments, color),
            Shape::Cone { segments } => self.push_cone(base, part.size, segments, color),
        }
    }

    fn vertex(&mut self, position: Vec3, normal: Vec3, color: Vec4) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(Vertex {
            position: position.to_array(),
            normal: normal.to_array(),
            color: color.to_array(),
        });
        index
    }

    /// Flat-shaded quad, corners in counter-clockwise order seen from outside
    fn quad(&mut self, corners: [Vec3; 4], normal: Vec3, color: Vec4) {
        let i: Vec<u32> = corners.iter().map(|&c| self.vertex(c, normal, color)).collect();
        self.indices.extend_from_slice(&[i[0], i[1], i[2], i[0], i[2], i[3]]);
    }

    fn triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: Vec4) {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let ia = self.vertex(a, normal, color);
        let ib = self.vertex(b, normal, color);
        let ic = self.vertex(c, normal, color);
        self.indices.extend_from_slice(&[ia, ib, ic]);
    }

    /// Axis-aligned box; `base` is the center of the bottom face
    pub fn push_box(&mut self, base: Vec3, size: Vec3, color: Vec4) {
        let hx = size.x * 0.5;
        let hz = size.z * 0.5;
        let (x0, x1) = (base.x - hx, base.x + hx);
        let (y0, y1) = (base.y, base.y + size.y);
        let (z0, z1) = (base.z - hz, base.z + hz);
        let v = |x, y, z| Vec3::new(x, y, z);

        self.quad([v(x0, y0, z1), v(x1, y0, z1), v(x1, y1, z1), v(x0, y1, z1)], Vec3::Z, color);
        self.quad([v(x1, y0, z0), v(x0, y0, z0), v(x0, y1, z0), v(x1, y1, z0)], Vec3::NEG_Z, color);
        self.quad([v(x1, y0, z1), v(x1, y0, z0), v(x1, y1, z0), v(x1, y1, z1)], Vec3::X, color);
        self.quad([v(x0, y0, z0), v(x0, y0, z1), v(x0, y1, z1), v(x0, y1, z0)], Vec3::NEG_X, color);
        self.quad([v(x0, y1, z1), v(x1, y1, z1), v(x1, y1, z0), v(x0, y1, z0)], Vec3::Y, color);
        self.quad([v(x0, y0, z0), v(x1, y0, z0), v(x1, y0, z1), v(x0, y0, z1)], Vec3::NEG_Y, color);
    }

    /// Rectangular-based pyramid with its apex above `base`
    pub fn push_pyramid(&mut self, base: Vec3, size: Vec3, color: Vec4) {
        let hx = size.x * 0.5;
        let hz = size.z * 0.5;
        let apex = base + Vec3::Y * size.y;
        let c = [
            base + Vec3::new(-hx, 0.0, hz),
            base + Vec3::new(hx, 0.0, hz),
            base + Vec3::new(hx, 0.0, -hz),
            base + Vec3::new(-hx, 0.0, -hz),
        ];
        for k in 0..4 {
            self.triangle(c[k], c[(k + 1) % 4], apex, color);
        }
        self.quad([c[3], c[2], c[1], c[0]], Vec3::NEG_Y, color);
    }

    fn ring(base: Vec3, rx: f32, rz: f32, segments: u32) -> Vec<Vec3> {
        (0..segments)
            .map(|i| {
                let a = i as f32 / segments as f32 * std::f32::consts::TAU;
                base + Vec3::new(a.cos() * rx, 0.0, -a.sin() * rz)
            })
            .collect()
    }

    /// Elliptic cylinder standing on `base`
    pub fn push_cylinder(&mut self, base: Vec3, size: Vec3, segments: u32, color: Vec4) {
        let segments = segments.max(3);
        let bottom = Self::ring(base, size.x * 0.5, size.z * 0.5, segments);
        let lift = Vec3::Y * size.y;
        let n = bottom.len();
        for k in 0..n {
            let (a, b) = (bottom[k], bottom[(k + 1) % n]);
            let mid = (a + b) * 0.5 - base;
            let normal = Vec3::new(mid.x, 0.0, mid.z).normalize_or_zero();
            self.quad([a, b, b + lift, a + lift], normal, color);
            self.triangle(base + lift, a + lift, b + lift, color);
            self.triangle(base, b, a, color);
        }
    }

    /// Elliptic cone with its apex above `base`
    pub fn push_cone(&mut self, base: Vec3, size: Vec3, segments: u32, color: Vec4) {
        let segments = segments.max(3);
        let bottom = Self::ring(base, size.x * 0.5, size.z * 0.5, segments);
        let apex = base + Vec3::Y * size.y;
        let n = bottom.len();
        for k in 0..n {
            let (a, b) = (bottom[k], bottom[(k + 1) % n]);
            self.triangle(a, b, apex, color);
            self.triangle(base, b, a, color);
        }
    }

    /// Axis-aligned bounds of all vertices
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from(v.position));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}
