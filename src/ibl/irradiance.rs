//! Diffuse irradiance convolution bake stage
//!
//! Integrates the environment cubemap over the hemisphere around each
//! output direction with cosine weighting, producing the low-resolution
//! irradiance cubemap used by the diffuse IBL term.

use crate::ibl::capture::{cube_capture_pipeline, cubemap_source_layout, CaptureTarget};
use crate::ibl::cubemap::Cubemap;
use crate::ibl::projector::{
    capture_uniform_layout, CaptureBinding, CaptureUniform, CubeFace,
};
use crate::resources::GpuMesh;

/// Pipeline convolving an environment cubemap into an irradiance map
pub struct IrradiancePass {
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    source_layout: wgpu::BindGroupLayout,
}

impl IrradiancePass {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_layout = capture_uniform_layout(device);
        let source_layout = cubemap_source_layout(device);

        let pipeline = cube_capture_pipeline(
            device,
            "Irradiance Pipeline",
            include_str!("../shaders/irradiance.wgsl"),
            &[&uniform_layout, &source_layout],
        );

        Self {
            pipeline,
            uniform_layout,
            source_layout,
        }
    }

    /// Convolve `environment` into all six faces of `target`
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
            label: Some("Irradiance Source"),
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

        capture.ensure_size(device, target.size);
        let depth_view = capture.depth_view();

        for face in CubeFace::ALL {
            let binding = CaptureBinding::new(
                device,
                &self.uniform_layout,
                CaptureUniform::for_face(face, 0.0),
                "Irradiance Face Uniform",
            );
            let face_view = target.face_view(face, 0);

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Irradiance Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &face_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
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
