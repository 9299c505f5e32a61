//! Mesh data structures and primitive generation

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

/// Vertex format shared by all meshes in the viewer
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    /// Vertex buffer layout matching the WGSL vertex inputs
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// A mesh with vertex and index data
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub name: String,
}

impl Mesh {
    pub fn new(name: &str) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            name: name.to_string(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Create a cube spanning [-1, 1] on each axis, centered at the origin.
    ///
    /// Used both for the skybox and for projecting environment sources onto
    /// cubemap faces; the capture projection's near/far (0.1/10) fully
    /// contains it.
    pub fn cube() -> Self {
        let mut mesh = Mesh::new("cube");

        let faces: [(Vec3, Vec3, Vec3); 6] = [
            // (normal, tangent u, tangent v) per face
            (Vec3::Z, Vec3::X, Vec3::Y),
            (-Vec3::Z, -Vec3::X, Vec3::Y),
            (Vec3::X, -Vec3::Z, Vec3::Y),
            (-Vec3::X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, -Vec3::Z),
            (-Vec3::Y, Vec3::X, Vec3::Z),
        ];

        for (face, (normal, u_axis, v_axis)) in faces.iter().enumerate() {
            let base = (face * 4) as u32;
            for (du, dv, u, v) in [
                (-1.0, -1.0, 0.0, 1.0),
                (1.0, -1.0, 1.0, 1.0),
                (1.0, 1.0, 1.0, 0.0),
                (-1.0, 1.0, 0.0, 0.0),
            ] {
                mesh.vertices.push(Vertex {
                    position: *normal + *u_axis * du + *v_axis * dv,
                    normal: *normal,
                    uv: Vec2::new(u, v),
                });
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        mesh
    }

    /// Create a unit-radius UV sphere as a triangle list
    pub fn uv_sphere(segments: u32, rings: u32) -> Self {
        let mut mesh = Mesh::new("sphere");

        for ring in 0..=rings {
            let phi = ring as f32 * std::f32::consts::PI / rings as f32;
            let y = phi.cos();
            let ring_radius = phi.sin();

            for segment in 0..=segments {
                let theta = segment as f32 * 2.0 * std::f32::consts::PI / segments as f32;
                let x = ring_radius * theta.cos();
                let z = ring_radius * theta.sin();

                // Unit radius, so the position doubles as the normal
                let position = Vec3::new(x, y, z);
                mesh.vertices.push(Vertex {
                    position,
                    normal: position,
                    uv: Vec2::new(
                        segment as f32 / segments as f32,
                        ring as f32 / rings as f32,
                    ),
                });
            }
        }

        for ring in 0..rings {
            for segment in 0..segments {
                let current = ring * (segments + 1) + segment;
                let next = current + segments + 1;
                mesh.indices.extend_from_slice(&[
                    current,
                    next,
                    current + 1,
                    current + 1,
                    next,
                    next + 1,
                ]);
            }
        }

        mesh
    }

    /// Create a fullscreen quad in NDC (two triangles)
    pub fn screen_quad() -> Self {
        let mut mesh = Mesh::new("screen_quad");

        for (x, y, u, v) in [
            (-1.0, 1.0, 0.0, 0.0),
            (-1.0, -1.0, 0.0, 1.0),
            (1.0, -1.0, 1.0, 1.0),
            (1.0, 1.0, 1.0, 0.0),
        ] {
            mesh.vertices.push(Vertex {
                position: Vec3::new(x, y, 0.0),
                normal: Vec3::Z,
                uv: Vec2::new(u, v),
            });
        }
        mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);

        mesh
    }
}

/// GPU buffers for a mesh
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    /// Upload mesh data to the GPU
    pub fn upload(device: &wgpu::Device, mesh: &Mesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", mesh.name)),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", mesh.name)),
            contents: mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
        }
    }

    /// Issue the draw for this mesh on an active render pass
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_six_faces() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.index_count(), 36);
    }

    #[test]
    fn cube_corners_span_unit_box() {
        let cube = Mesh::cube();
        for v in &cube.vertices {
            assert!(v.position.abs().max_element() <= 1.0 + 1e-6);
            assert!((v.position.abs().max_element() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn sphere_vertex_and_index_counts() {
        let segments = 64;
        let rings = 64;
        let sphere = Mesh::uv_sphere(segments, rings);
        assert_eq!(
            sphere.vertex_count() as u32,
            (segments + 1) * (rings + 1)
        );
        assert_eq!(sphere.index_count() as u32, segments * rings * 6);
        assert_eq!(sphere.index_count() % 3, 0);
    }

    #[test]
    fn sphere_positions_on_unit_sphere() {
        let sphere = Mesh::uv_sphere(16, 16);
        for v in &sphere.vertices {
            assert!((v.position.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn screen_quad_covers_ndc() {
        let quad = Mesh::screen_quad();
        assert_eq!(quad.vertex_count(), 4);
        assert_eq!(quad.index_count(), 6);
        for v in &quad.vertices {
            assert!(v.position.x.abs() <= 1.0 && v.position.y.abs() <= 1.0);
            assert_eq!(v.position.z, 0.0);
        }
    }
}
