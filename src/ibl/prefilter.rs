//! Specular prefilter bake stage
//!
//! Importance-samples the environment cubemap with the GGX distribution
//! at increasing roughness per mip level. Mip m of the 128-pixel target
//! is rendered at 128 >> m with roughness m / (mip_count - 1), so mip 0
//! is a mirror and the last mip is fully rough.

use crate::ibl::capture::{cube_capture_pipeline, cubemap_source_layout, CaptureTarget};
use crate::ibl::cubemap::Cubemap;
use crate::ibl::projector::{
    capture_uniform_layout, CaptureBinding, CaptureUniform, CubeFace,
};
use crate::resources::GpuMesh;

/// Roughness assigned to mip `mip` of a chain with `mip_count` levels.
/// The chain needs at least two levels to span roughness 0 to 1.
pub fn mip_roughness(mip: u32, mip_count: u32) -> f32 {
    debug_assert!(mip_count > 1, "roughness chain needs at least two mips");
    mip as f32 / (mip_count - 1) as f32
}

/// Pipeline prefiltering an environment cubemap into a mip chain
pub struct PrefilterPass {
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    source_layout: wgpu::BindGroupLayout,
}

impl PrefilterPass {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_layout = capture_uniform_layout(device);
        let source_layout = cubemap_source_layout(device);

        let pipeline = cube_capture_pipeline(
            device,
            "Prefilter Pipeline",
            include_str!("../shaders/prefilter.wgsl"),
            &[&uniform_layout, &source_layout],
        );

        Self {
            pipeline,
            uniform_layout,
            source_layout,
        }
    }

    /// Fill every mip of every face of `target` from `environment`
    pub fn bake(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        capture: &mut CaptureTarget,
        cube: &GpuMesh,
        environment: &Cubemap,
        target: &Cubemap,
    ) {
        let source_bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Prefilter Source"),
            layout: &self.source_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&environment.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&environment.sampler),
                },
            ],
        });

        for mip in 0..target.mip_count {
            let roughness = mip_roughness(mip, target.mip_count);
            capture.ensure_size(device, target.mip_size(mip));

            for face in CubeFace::ALL {
                let binding = CaptureBinding::new(
                    device,
                    &self.uniform_layout,
                    CaptureUniform::for_face(face, roughness),
                    "Prefilter Face Uniform",
                );
                let face_view = target.face_view(face, mip);

                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Prefilter Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &face_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: capture.depth_view(),
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &binding.bind_group, &[]);
                pass.set_bind_group(1, &source_bind, &[]);
                cube.draw(&mut pass);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roughness_schedule_spans_zero_to_one() {
        let schedule: Vec<f32> = (0..5).map(|m| mip_roughness(m, 5)).collect();
        assert_eq!(schedule, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn roughness_is_strictly_increasing() {
        for m in 1..5 {
            assert!(mip_roughness(m, 5) > mip_roughness(m - 1, 5));
        }
    }

    #[test]
    #[should_panic(expected = "at least two mips")]
    fn single_level_chain_is_rejected() {
        mip_roughness(0, 1);
    }
}
