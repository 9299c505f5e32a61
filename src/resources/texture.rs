//! Texture loading and GPU upload
//!
//! Two source kinds are supported: 8-bit images for material maps and
//! floating-point Radiance HDR images for equirectangular environments.
//! Every loader returns a `Result` so callers decide whether a missing
//! asset is fatal.

use image::GenericImageView;
use std::path::Path;
use thiserror::Error;

/// Asset loading error type
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },
}

pub type AssetResult<T> = Result<T, AssetError>;

/// Decoded 8-bit RGBA texture data
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub name: String,
}

impl TextureData {
    /// Load an 8-bit texture from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AssetResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let img = image::open(path).map_err(|e| AssetError::Decode {
            path: path.display().to_string(),
            source: e,
        })?;

        let (width, height) = img.dimensions();
        let data = img.to_rgba8().into_raw();

        Ok(Self {
            width,
            height,
            data,
            name,
        })
    }

    /// Create a 1x1 solid color texture
    pub fn solid_color(color: [u8; 4], name: &str) -> Self {
        Self {
            width: 1,
            height: 1,
            data: color.to_vec(),
            name: name.to_string(),
        }
    }
}

/// Decoded equirectangular HDR environment source.
///
/// Pixels are linear radiance, 3 channels, row-major with the image
/// flipped vertically on load (matching the conventions of the HDR
/// sources this viewer ships with).
pub struct HdrImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<f32>,
    pub name: String,
}

impl HdrImage {
    /// Load and decode a Radiance HDR file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AssetResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let img = image::open(path).map_err(|e| AssetError::Decode {
            path: path.display().to_string(),
            source: e,
        })?;

        let rgb = img.flipv().to_rgb32f();
        let (width, height) = rgb.dimensions();

        Ok(Self {
            width,
            height,
            pixels: rgb.into_raw(),
            name,
        })
    }

    /// Expand RGB f32 pixels to RGBA half floats (alpha = 1) for GPU upload
    pub fn to_rgba16f(&self) -> Vec<u16> {
        let mut out = Vec::with_capacity((self.width * self.height * 4) as usize);
        let one = half::f16::from_f32(1.0).to_bits();
        for rgb in self.pixels.chunks_exact(3) {
            out.push(half::f16::from_f32(rgb[0]).to_bits());
            out.push(half::f16::from_f32(rgb[1]).to_bits());
            out.push(half::f16::from_f32(rgb[2]).to_bits());
            out.push(one);
        }
        out
    }
}

/// GPU texture with associated view and sampler
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl GpuTexture {
    /// Upload 8-bit RGBA texture data (sRGB, repeat wrapping, linear filtering)
    pub fn from_data(device: &wgpu::Device, queue: &wgpu::Queue, data: &TextureData) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&data.name),
            size: wgpu::Extent3d {
                width: data.width,
                height: data.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data.data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(data.width * 4),
                rows_per_image: Some(data.height),
            },
            wgpu::Extent3d {
                width: data.width,
                height: data.height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", data.name)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width: data.width,
            height: data.height,
        }
    }

    /// Upload an equirectangular HDR source as Rgba16Float, clamp-to-edge
    pub fn from_hdr(device: &wgpu::Device, queue: &wgpu::Queue, hdr: &HdrImage) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&hdr.name),
            size: wgpu::Extent3d {
                width: hdr.width,
                height: hdr.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba16Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let data = hdr.to_rgba16f();
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&data),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(hdr.width * 8),
                rows_per_image: Some(hdr.height),
            },
            wgpu::Extent3d {
                width: hdr.width,
                height: hdr.height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", hdr.name)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width: hdr.width,
            height: hdr.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let result = TextureData::from_file("does/not/exist.jpg");
        assert!(result.is_err());
        let result = HdrImage::from_file("does/not/exist.hdr");
        assert!(result.is_err());
    }

    #[test]
    fn solid_color_is_one_pixel() {
        let tex = TextureData::solid_color([255, 128, 0, 255], "orange");
        assert_eq!(tex.width, 1);
        assert_eq!(tex.height, 1);
        assert_eq!(tex.data, vec![255, 128, 0, 255]);
    }

    #[test]
    fn rgba16f_expansion_adds_alpha() {
        let hdr = HdrImage {
            width: 2,
            height: 1,
            pixels: vec![1.0, 0.5, 0.25, 2.0, 4.0, 8.0],
            name: "test".into(),
        };
        let data = hdr.to_rgba16f();
        assert_eq!(data.len(), 8);
        assert_eq!(data[0], half::f16::from_f32(1.0).to_bits());
        assert_eq!(data[3], half::f16::from_f32(1.0).to_bits());
        assert_eq!(data[4], half::f16::from_f32(2.0).to_bits());
        assert_eq!(data[7], half::f16::from_f32(1.0).to_bits());
    }
}
