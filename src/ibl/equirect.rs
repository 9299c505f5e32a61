//! Equirectangular projection bake stage
//!
//! Renders the decoded HDR panorama onto the six faces of the
//! environment cubemap by drawing a unit cube from the origin and
//! sampling the panorama by direction.

use crate::ibl::capture::{cube_capture_pipeline, CaptureTarget};
use crate::ibl::cubemap::Cubemap;
use crate::ibl::projector::{
    capture_uniform_layout, CaptureBinding, CaptureUniform, CubeFace,
};
use crate::resources::{GpuMesh, GpuTexture};

/// Pipeline projecting an equirectangular source onto cubemap faces
pub struct EquirectPass {
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    source_layout: wgpu::BindGroupLayout,
}

impl EquirectPass {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_layout = capture_uniform_layout(device);
        let source_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Equirect Source Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline = cube_capture_pipeline(
            device,
            "Equirect Pipeline",
            include_str!("../shaders/equirect_to_cube.wgsl"),
            &[&uniform_layout, &source_layout],
        );

        Self {
            pipeline,
            uniform_layout,
            source_layout,
        }
    }

    /// Project the panorama onto all six faces of `target` (mip 0)
    pub fn bake(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        capture: &mut CaptureTarget,
        cube: &GpuMesh,
        source: &GpuTexture,
        target: &Cubemap,
    ) {
        let source_bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Equirect Source"),
            layout: &self.source_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&source.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&source.sampler),
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
                "Equirect Face Uniform",
            );
            let face_view = target.face_view(face, 0);

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Equirect Pass"),
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
