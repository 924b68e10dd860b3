use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Segment count used for every cylinder in the park.
pub const CYLINDER_SEGMENTS: u32 = 16;

/// Interleaved vertex as uploaded to the GPU: `position.xyz` then `normal.xyz`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// Indexed triangle list. Front faces wind counter-clockwise seen from outside.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a quad strip laid out as interleaved (top, bottom) pairs.
    fn push_strip(&mut self, strip: &[Vertex]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(strip);
        let pairs = strip.len() as u32 / 2;
        for i in 0..pairs.saturating_sub(1) {
            let top = base + 2 * i;
            let bottom = top + 1;
            let next_top = top + 2;
            let next_bottom = top + 3;
            self.indices
                .extend_from_slice(&[top, next_top, bottom, bottom, next_top, next_bottom]);
        }
    }

    /// Appends a triangle fan whose first vertex is the hub.
    ///
    /// Every fan goes through the same rule, so a fan listed in reverse ring
    /// order comes out facing the opposite way.
    fn push_fan(&mut self, fan: &[Vertex]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(fan);
        for k in 1..(fan.len() as u32).saturating_sub(1) {
            self.indices.extend_from_slice(&[base, base + k + 1, base + k]);
        }
    }
}

/// Closed tube centred on the origin, axis along +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    pub radius: f32,
    pub height: f32,
    pub segments: u32,
}

impl Cylinder {
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius,
            height,
            segments: CYLINDER_SEGMENTS,
        }
    }

    /// Ring point for iteration `i`; `i == segments` lands back on angle zero.
    fn ring_point(&self, i: u32, y: f32) -> Vec3 {
        let angle = TAU * i as f32 / self.segments as f32;
        Vec3::new(self.radius * angle.cos(), y, self.radius * angle.sin())
    }

    /// Side wall as `2 * (segments + 1)` vertices, top/bottom interleaved.
    pub fn side_strip(&self) -> Vec<Vertex> {
        let half = self.height / 2.0;
        let mut strip = Vec::with_capacity(2 * (self.segments as usize + 1));
        for i in 0..=self.segments {
            let top = self.ring_point(i, half);
            let normal = Vec3::new(top.x / self.radius, 0.0, top.z / self.radius);
            strip.push(Vertex::new(top, normal));
            strip.push(Vertex::new(Vec3::new(top.x, -half, top.z), normal));
        }
        strip
    }

    /// Top cap: hub followed by the ring in increasing angle.
    pub fn top_fan(&self) -> Vec<Vertex> {
        let half = self.height / 2.0;
        let normal = Vec3::Y;
        std::iter::once(Vertex::new(Vec3::new(0.0, half, 0.0), normal))
            .chain((0..=self.segments).map(|i| Vertex::new(self.ring_point(i, half), normal)))
            .collect()
    }

    /// Bottom cap: hub followed by the ring in decreasing angle.
    pub fn bottom_fan(&self) -> Vec<Vertex> {
        let half = self.height / 2.0;
        let normal = Vec3::NEG_Y;
        std::iter::once(Vertex::new(Vec3::new(0.0, -half, 0.0), normal))
            .chain(
                (0..=self.segments)
                    .rev()
                    .map(|i| Vertex::new(self.ring_point(i, -half), normal)),
            )
            .collect()
    }

    pub fn mesh(&self) -> Mesh {
        let mut mesh = Mesh::default();
        mesh.push_strip(&self.side_strip());
        mesh.push_fan(&self.top_fan());
        mesh.push_fan(&self.bottom_fan());
        mesh
    }
}

/// Axis-aligned cube of edge `size` centred on the origin, one normal per face.
pub fn cube(size: f32) -> Mesh {
    // (normal, u, v) with u x v == normal so the corner order below is CCW.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    let half = size / 2.0;
    let mut mesh = Mesh::default();
    for (normal, u, v) in FACES {
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = (normal + u * su + v * sv) * half;
            mesh.vertices.push(Vertex::new(position, normal));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Latitude/longitude sphere with poles on the Y axis.
pub fn sphere(radius: f32, slices: u32, stacks: u32) -> Mesh {
    let slices = slices.max(3);
    let stacks = stacks.max(2);
    let mut mesh = Mesh::default();

    for stack in 0..=stacks {
        let phi = PI * stack as f32 / stacks as f32;
        let y = phi.cos();
        let ring = phi.sin();
        for slice in 0..=slices {
            let theta = TAU * slice as f32 / slices as f32;
            let normal = Vec3::new(ring * theta.cos(), y, ring * theta.sin());
            mesh.vertices.push(Vertex::new(normal * radius, normal));
        }
    }

    for stack in 0..stacks {
        for slice in 0..slices {
            let current = stack * (slices + 1) + slice;
            let below = current + slices + 1;
            mesh.indices.extend_from_slice(&[
                current,
                current + 1,
                below,
                current + 1,
                below + 1,
                below,
            ]);
        }
    }
    mesh
}

/// Square on the XZ plane spanning `[-half_extent, half_extent]`, facing +Y.
pub fn ground_quad(half_extent: f32) -> Mesh {
    let e = half_extent;
    let corners = [
        Vec3::new(-e, 0.0, -e),
        Vec3::new(-e, 0.0, e),
        Vec3::new(e, 0.0, e),
        Vec3::new(e, 0.0, -e),
    ];
    Mesh {
        vertices: corners.iter().map(|&c| Vertex::new(c, Vec3::Y)).collect(),
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every non-degenerate triangle must face the same way as its vertex normals.
    fn assert_outward(mesh: &Mesh) {
        for triangle in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices[triangle[k] as usize]);
            let face = (b.position() - a.position()).cross(c.position() - a.position());
            if face.length_squared() < 1e-10 {
                continue;
            }
            let normal = a.normal() + b.normal() + c.normal();
            assert!(
                face.dot(normal) > 0.0,
                "triangle {triangle:?} winds against its normals"
            );
        }
    }

    #[test]
    fn cylinder_vertex_counts() {
        let cylinder = Cylinder::new(0.08, 3.0);
        let n = CYLINDER_SEGMENTS as usize;
        assert_eq!(cylinder.side_strip().len(), 2 * (n + 1));
        assert_eq!(cylinder.top_fan().len(), n + 2);
        assert_eq!(cylinder.bottom_fan().len(), n + 2);

        let mesh = cylinder.mesh();
        assert_eq!(mesh.vertices.len(), 2 * (n + 1) + 2 * (n + 2));
        assert_eq!(mesh.triangle_count(), 2 * n + 2 * n);
    }

    #[test]
    fn cylinder_ring_closes() {
        let cylinder = Cylinder::new(0.2, 2.5);
        let strip = cylinder.side_strip();
        let first = &strip[..2];
        let last = &strip[strip.len() - 2..];
        for (a, b) in first.iter().zip(last) {
            assert!(a.position().distance(b.position()) < 1e-5);
            assert!(a.normal().distance(b.normal()) < 1e-5);
        }
    }

    #[test]
    fn cylinder_side_normals_are_radial() {
        let cylinder = Cylinder::new(0.2, 2.5);
        for vertex in cylinder.side_strip() {
            let normal = vertex.normal();
            assert!((normal.length() - 1.0).abs() < 1e-5);
            assert_eq!(normal.y, 0.0);
            let radial = Vec3::new(vertex.position[0], 0.0, vertex.position[2]).normalize();
            assert!(radial.distance(normal) < 1e-5);
        }
    }

    #[test]
    fn cylinder_caps_and_extent() {
        let cylinder = Cylinder::new(0.08, 3.0);
        assert!(cylinder.top_fan().iter().all(|v| v.normal() == Vec3::Y));
        assert!(cylinder.bottom_fan().iter().all(|v| v.normal() == Vec3::NEG_Y));
        assert!(cylinder.top_fan().iter().all(|v| v.position[1] == 1.5));
        assert!(cylinder.bottom_fan().iter().all(|v| v.position[1] == -1.5));
    }

    #[test]
    fn primitives_wind_outward() {
        assert_outward(&Cylinder::new(0.08, 3.0).mesh());
        assert_outward(&cube(1.0));
        assert_outward(&sphere(1.2, 20, 20));
        assert_outward(&ground_quad(10.0));
    }

    #[test]
    fn cube_spans_unit_box() {
        let mesh = cube(1.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        for vertex in &mesh.vertices {
            assert!(vertex.position.iter().all(|c| (c.abs() - 0.5).abs() < 1e-6));
        }
    }

    #[test]
    fn sphere_vertices_sit_on_radius() {
        let mesh = sphere(0.2, 16, 16);
        assert_eq!(mesh.vertices.len(), 17 * 17);
        assert_eq!(mesh.triangle_count(), 16 * 16 * 2);
        for vertex in &mesh.vertices {
            assert!((vertex.position().length() - 0.2).abs() < 1e-5);
        }
    }
}
