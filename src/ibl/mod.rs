//! Image-based lighting precomputation
//!
//! Each environment is baked once at startup from an equirectangular
//! HDR panorama into the three textures the PBR shader samples at
//! runtime: the environment cubemap (background), the irradiance
//! cubemap (diffuse term) and the prefiltered mip chain (specular
//! term). A fourth texture, the BRDF lookup table, is environment
//! independent and baked a single time.

mod brdf_lut;
mod capture;
mod cubemap;
mod equirect;
mod graph;
mod irradiance;
mod prefilter;
mod projector;

pub use brdf_lut::{BrdfLut, BRDF_LUT_SIZE};
pub use capture::CaptureTarget;
pub use cubemap::Cubemap;
pub use equirect::EquirectPass;
pub use graph::{BakeGraph, BakeResource, BakeStage, GraphError};
pub use irradiance::IrradiancePass;
pub use prefilter::{mip_roughness, PrefilterPass};
pub use projector::{capture_projection, CaptureBinding, CaptureUniform, CubeFace};

use crate::resources::{AssetError, GpuMesh, GpuTexture, HdrImage, Mesh};
use std::path::Path;
use thiserror::Error;

pub const ENVIRONMENT_SIZE: u32 = 512;
pub const IRRADIANCE_SIZE: u32 = 32;
pub const PREFILTER_SIZE: u32 = 128;
pub const PREFILTER_MIP_COUNT: u32 = 5;

#[derive(Error, Debug)]
pub enum BakeError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// The baked texture set for one environment
pub struct EnvironmentMaps {
    pub environment: Cubemap,
    pub irradiance: Cubemap,
    pub prefiltered: Cubemap,
    pub name: String,
}

/// Orchestrates the offscreen bake passes.
///
/// The pipelines are created once; each environment reuses them with
/// fresh target cubemaps. All stages are recorded into one encoder and
/// submitted together, in the order the bake graph derives.
pub struct IblBaker {
    equirect: EquirectPass,
    irradiance: IrradiancePass,
    prefilter: PrefilterPass,
    graph: BakeGraph,
    capture: CaptureTarget,
    cube: GpuMesh,
    brdf_lut: BrdfLut,
}

impl IblBaker {
    /// Create the bake pipelines and bake the shared BRDF lookup table
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let cube = GpuMesh::upload(device, &Mesh::cube());
        let quad = GpuMesh::upload(device, &Mesh::screen_quad());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("BRDF LUT Encoder"),
        });
        let brdf_lut = BrdfLut::bake(device, &mut encoder, &quad);
        queue.submit(Some(encoder.finish()));
        log::info!("Baked BRDF lookup table ({0}x{0})", BRDF_LUT_SIZE);

        Self {
            equirect: EquirectPass::new(device),
            irradiance: IrradiancePass::new(device),
            prefilter: PrefilterPass::new(device),
            graph: BakeGraph::default(),
            capture: CaptureTarget::new(device, ENVIRONMENT_SIZE),
            cube,
            brdf_lut,
        }
    }

    pub fn brdf_lut(&self) -> &BrdfLut {
        &self.brdf_lut
    }

    /// Bake one environment from an equirectangular HDR file
    pub fn bake(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<EnvironmentMaps, BakeError> {
        let hdr = HdrImage::from_file(path)?;
        log::info!(
            "Baking environment {} ({}x{})",
            hdr.name,
            hdr.width,
            hdr.height
        );
        let source = GpuTexture::from_hdr(device, queue, &hdr);

        let environment = Cubemap::new(device, "Environment", ENVIRONMENT_SIZE, 1);
        let irradiance = Cubemap::new(device, "Irradiance", IRRADIANCE_SIZE, 1);
        let prefiltered = Cubemap::new(device, "Prefiltered", PREFILTER_SIZE, PREFILTER_MIP_COUNT);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("IBL Bake Encoder"),
        });

        for stage in self.graph.ordered()? {
            match stage {
                BakeStage::EquirectProjection => self.equirect.bake(
                    device,
                    &mut encoder,
                    &mut self.capture,
                    &self.cube,
                    &source,
                    &environment,
                ),
                BakeStage::IrradianceConvolution => self.irradiance.bake(
                    device,
                    &mut encoder,
                    &mut self.capture,
                    &self.cube,
                    &environment,
                    &irradiance,
                ),
                BakeStage::SpecularPrefilter => self.prefilter.bake(
                    device,
                    &mut encoder,
                    &mut self.capture,
                    &self.cube,
                    &environment,
                    &prefiltered,
                ),
            }
        }

        queue.submit(Some(encoder.finish()));

        Ok(EnvironmentMaps {
            environment,
            irradiance,
            prefiltered,
            name: hdr.name,
        })
    }

    /// Bake every listed environment, skipping (and logging) failures
    pub fn bake_all(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        paths: &[std::path::PathBuf],
    ) -> Vec<Option<EnvironmentMaps>> {
        paths
            .iter()
            .map(|path| match self.bake(device, queue, path) {
                Ok(maps) => Some(maps),
                Err(e) => {
                    log::error!("Skipping environment {}: {}", path.display(), e);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bake_resolutions_match_the_pipeline_contract() {
        assert_eq!(ENVIRONMENT_SIZE, 512);
        assert_eq!(IRRADIANCE_SIZE, 32);
        assert_eq!(PREFILTER_SIZE, 128);
        assert_eq!(PREFILTER_MIP_COUNT, 5);
        assert_eq!(BRDF_LUT_SIZE, 512);
    }

    #[test]
    fn prefilter_mip_sizes_reach_eight() {
        let smallest = PREFILTER_SIZE >> (PREFILTER_MIP_COUNT - 1);
        assert_eq!(smallest, 8);
    }
}
