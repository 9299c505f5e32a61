//! Renderable cubemap textures
//!
//! Cubemaps are stored as 6-layer 2D array textures in Rgba16Float.
//! A cube-dimension view is used for sampling; individual face/mip
//! layers get their own 2D views so they can serve as render targets
//! during baking.

use crate::ibl::projector::CubeFace;

/// A cubemap texture with a sampling view and per-face render views
pub struct Cubemap {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub size: u32,
    pub mip_count: u32,
}

impl Cubemap {
    /// Allocate a renderable cubemap of the given face size and mip count
    pub fn new(device: &wgpu::Device, label: &str, size: u32, mip_count: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 6,
            },
            mip_level_count: mip_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba16Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(&format!("{label} Cube View")),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label} Sampler")),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            size,
            mip_count,
        }
    }

    /// 2D render-target view for one face at one mip level
    pub fn face_view(&self, face: CubeFace, mip: u32) -> wgpu::TextureView {
        self.texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(&format!("Cubemap Face {:?} Mip {}", face, mip)),
            dimension: Some(wgpu::TextureViewDimension::D2),
            base_mip_level: mip,
            mip_level_count: Some(1),
            base_array_layer: face.layer(),
            array_layer_count: Some(1),
            ..Default::default()
        })
    }

    /// Face edge length at the given mip level
    pub fn mip_size(&self, mip: u32) -> u32 {
        (self.size >> mip).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mip_sizes_halve_and_clamp() {
        let sizes: Vec<u32> = (0..5).map(|m| (128u32 >> m).max(1)).collect();
        assert_eq!(sizes, vec![128, 64, 32, 16, 8]);
        assert_eq!((1u32 >> 3).max(1), 1);
    }
}
