//! Cube face capture cameras
//!
//! Each cubemap face is rendered with a 90 degree perspective camera
//! placed at the origin. The view table fixes both the look direction
//! and the up vector per face so the face orientations match the
//! cubemap sampling convention.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

/// The six cubemap faces in layer order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Array layer index of this face
    pub fn layer(self) -> u32 {
        self as u32
    }

    /// Look direction of the capture camera for this face
    pub fn direction(self) -> Vec3 {
        match self {
            CubeFace::PositiveX => Vec3::X,
            CubeFace::NegativeX => Vec3::NEG_X,
            CubeFace::PositiveY => Vec3::Y,
            CubeFace::NegativeY => Vec3::NEG_Y,
            CubeFace::PositiveZ => Vec3::Z,
            CubeFace::NegativeZ => Vec3::NEG_Z,
        }
    }

    /// Up vector of the capture camera for this face
    pub fn up(self) -> Vec3 {
        match self {
            CubeFace::PositiveY => Vec3::Z,
            CubeFace::NegativeY => Vec3::NEG_Z,
            _ => Vec3::NEG_Y,
        }
    }

    /// View matrix looking from the origin along this face
    pub fn view_matrix(self) -> Mat4 {
        Mat4::look_at_rh(Vec3::ZERO, self.direction(), self.up())
    }
}

/// 90 degree square projection used for every face capture
pub fn capture_projection() -> Mat4 {
    Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 10.0)
}

/// Per-face capture uniform (combined view-projection plus roughness for
/// the prefilter stage; unused stages leave roughness at zero)
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CaptureUniform {
    pub view_proj: Mat4,
    pub roughness: f32,
    pub _padding: [f32; 3],
}

impl CaptureUniform {
    pub fn for_face(face: CubeFace, roughness: f32) -> Self {
        Self {
            view_proj: capture_projection() * face.view_matrix(),
            roughness,
            _padding: [0.0; 3],
        }
    }
}

/// Pre-built uniform buffer and bind group for one capture draw.
///
/// Buffer writes issued through the queue all land before any encoder
/// submitted afterwards, so reusing one buffer across faces inside a
/// single encoder would make every face render with the last write.
/// Each face (and each prefilter mip) therefore gets its own buffer.
pub struct CaptureBinding {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl CaptureBinding {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform: CaptureUniform,
        label: &str,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self { buffer, bind_group }
    }
}

/// Bind group layout shared by every capture stage (uniform at binding 0)
pub fn capture_uniform_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Capture Uniform Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_layers_follow_cubemap_order() {
        let layers: Vec<u32> = CubeFace::ALL.iter().map(|f| f.layer()).collect();
        assert_eq!(layers, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn each_view_maps_its_direction_to_view_forward() {
        for face in CubeFace::ALL {
            let view = face.view_matrix();
            let forward = view.transform_vector3(face.direction());
            // Looking along the face direction lands on the view -Z axis
            assert!((forward - Vec3::NEG_Z).length() < 1e-5, "{:?}", face);
        }
    }

    #[test]
    fn up_vectors_are_orthogonal_to_directions() {
        for face in CubeFace::ALL {
            assert!(face.direction().dot(face.up()).abs() < 1e-6);
            assert!((face.up().length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn capture_projection_is_square_ninety_degrees() {
        let proj = capture_projection();
        // fov 90 with aspect 1 gives unit focal length on both axes
        assert!((proj.col(0).x - 1.0).abs() < 1e-5);
        assert!((proj.col(1).y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn capture_uniform_is_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<CaptureUniform>() % 16, 0);
    }
}
