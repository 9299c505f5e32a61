//! PBR material texture set
//!
//! The five material maps occupy fixed bindings in one bind group:
//! albedo=0, metallic=1, roughness=2, normal=3, ambient occlusion=4,
//! shared sampler=5.

use crate::resources::texture::{AssetResult, GpuTexture, TextureData};
use std::path::Path;

/// File paths for a material's five texture maps
#[derive(Debug, Clone)]
pub struct MaterialPaths {
    pub albedo: std::path::PathBuf,
    pub metallic: std::path::PathBuf,
    pub roughness: std::path::PathBuf,
    pub normal: std::path::PathBuf,
    pub occlusion: std::path::PathBuf,
}

/// GPU-resident material texture set bound to fixed slots
pub struct MaterialTextures {
    pub albedo: GpuTexture,
    pub metallic: GpuTexture,
    pub roughness: GpuTexture,
    pub normal: GpuTexture,
    pub occlusion: GpuTexture,
}

impl MaterialTextures {
    /// Load all five maps from disk and upload them.
    ///
    /// Any individual decode failure aborts the whole set; the caller
    /// decides whether to substitute defaults.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        paths: &MaterialPaths,
    ) -> AssetResult<Self> {
        let load = |path: &Path| -> AssetResult<GpuTexture> {
            let data = TextureData::from_file(path)?;
            log::info!(
                "Loaded material map {} ({}x{})",
                data.name,
                data.width,
                data.height
            );
            Ok(GpuTexture::from_data(device, queue, &data))
        };

        Ok(Self {
            albedo: load(&paths.albedo)?,
            metallic: load(&paths.metallic)?,
            roughness: load(&paths.roughness)?,
            normal: load(&paths.normal)?,
            occlusion: load(&paths.occlusion)?,
        })
    }

    /// Fallback set of solid-color maps for when assets are missing:
    /// grey albedo, non-metallic, mid roughness, flat normal, full AO.
    pub fn fallback(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let solid = |color: [u8; 4], name: &str| {
            GpuTexture::from_data(device, queue, &TextureData::solid_color(color, name))
        };

        Self {
            albedo: solid([128, 128, 128, 255], "fallback_albedo"),
            metallic: solid([0, 0, 0, 255], "fallback_metallic"),
            roughness: solid([128, 128, 128, 255], "fallback_roughness"),
            normal: solid([128, 128, 255, 255], "fallback_normal"),
            occlusion: solid([255, 255, 255, 255], "fallback_ao"),
        }
    }

    /// Bind group layout for the material slots (all fragment-visible)
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        let texture_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Bind Group Layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                texture_entry(2),
                texture_entry(3),
                texture_entry(4),
                wgpu::BindGroupLayoutEntry {
                    binding: 5,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    /// Create the bind group placing each map in its fixed slot
    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.albedo.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&self.metallic.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&self.roughness.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&self.normal.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&self.occlusion.view),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::Sampler(&self.albedo.sampler),
                },
            ],
        })
    }
}
