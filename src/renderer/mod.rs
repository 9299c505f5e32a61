//! Scene rendering
//!
//! Draws one frame: the textured PBR model, a small marker sphere at
//! each orbiting light, and the selected environment as background.
//! Frame-varying data (camera, lights, marker transforms) is written to
//! uniform buffers before the encoder is submitted.

mod pbr_pass;
mod sky_pass;

pub use pbr_pass::PbrPass;
pub use sky_pass::SkyPass;

use crate::ibl::{BrdfLut, EnvironmentMaps};
use crate::resources::{GpuMesh, MaterialTextures, Mesh};
use crate::scene::{CameraUniform, LightRig, LightsUniform, OrbitCamera, Projection, LIGHT_COUNT};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const MARKER_SCALE: f32 = 0.5;

/// Bind group layout for the per-frame uniforms (camera + lights)
pub fn frame_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let uniform_entry = |binding: u32, visibility: wgpu::ShaderStages| wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Frame Bind Group Layout"),
        entries: &[
            uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
            uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
        ],
    })
}

/// Per-object transform uniform
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct ModelUniform {
    model: Mat4,
    normal: Mat4,
}

impl ModelUniform {
    fn new(model: Mat4) -> Self {
        Self {
            model,
            normal: model.inverse().transpose(),
        }
    }
}

/// Uniform buffer + bind group for one drawn object
struct ObjectBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ObjectBinding {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, model: Mat4) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Uniform"),
            contents: bytemuck::bytes_of(&ModelUniform::new(model)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn update(&self, queue: &wgpu::Queue, model: Mat4) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&ModelUniform::new(model)));
    }
}

/// One selectable environment with its render bind groups
struct EnvironmentSlot {
    maps: EnvironmentMaps,
    ibl_bind: wgpu::BindGroup,
    sky_bind: wgpu::BindGroup,
}

/// Renders the demo scene into the swapchain
pub struct SceneRenderer {
    pbr: PbrPass,
    sky: SkyPass,
    frame_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    frame_bind: wgpu::BindGroup,
    material_bind: wgpu::BindGroup,
    sphere: GpuMesh,
    cube: GpuMesh,
    model_binding: ObjectBinding,
    marker_bindings: Vec<ObjectBinding>,
    slots: Vec<Option<EnvironmentSlot>>,
    selected: Option<usize>,
    depth_view: wgpu::TextureView,
}

impl SceneRenderer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        material: &MaterialTextures,
        environments: Vec<Option<EnvironmentMaps>>,
        brdf_lut: &BrdfLut,
    ) -> Self {
        let pbr = PbrPass::new(device, surface_format);
        let sky = SkyPass::new(device, surface_format);

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lights_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Lights Uniform"),
            size: std::mem::size_of::<LightsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = frame_bind_group_layout(device);
        let frame_bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        let material_layout = MaterialTextures::bind_group_layout(device);
        let material_bind = material.bind_group(device, &material_layout);

        let sphere = GpuMesh::upload(device, &Mesh::uv_sphere(64, 64));
        let cube = GpuMesh::upload(device, &Mesh::cube());

        let model_binding = ObjectBinding::new(device, &pbr.model_layout, Mat4::IDENTITY);
        let marker_bindings = (0..LIGHT_COUNT)
            .map(|_| ObjectBinding::new(device, &pbr.model_layout, Mat4::IDENTITY))
            .collect();

        let slots: Vec<Option<EnvironmentSlot>> = environments
            .into_iter()
            .map(|maps| {
                maps.map(|maps| EnvironmentSlot {
                    ibl_bind: pbr.ibl_bind_group(device, &maps, brdf_lut),
                    sky_bind: sky.env_bind_group(device, &maps),
                    maps,
                })
            })
            .collect();
        let selected = slots.iter().position(Option::is_some);
        if selected.is_none() {
            log::warn!("No environment baked successfully, rendering without IBL");
        }

        let depth_view = create_depth(device, width, height);

        Self {
            pbr,
            sky,
            frame_buffer,
            lights_buffer,
            frame_bind,
            material_bind,
            sphere,
            cube,
            model_binding,
            marker_bindings,
            slots,
            selected,
            depth_view,
        }
    }

    /// Switch the active environment; an unbaked slot keeps the current
    /// selection in effect
    pub fn select_environment(&mut self, index: usize) {
        match self.slots.get(index) {
            Some(Some(slot)) => {
                log::info!("Environment {} selected ({})", index, slot.maps.name);
                self.selected = Some(index);
            }
            _ => log::warn!("Environment {} is not available", index),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = create_depth(device, width, height);
    }

    /// Record one frame into `encoder`
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        camera: &OrbitCamera,
        projection: &Projection,
        lights: &LightRig,
        time: f32,
    ) {
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::new(camera, projection)),
        );
        queue.write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::bytes_of(&lights.uniform(time)),
        );
        for (binding, light) in self.marker_bindings.iter().zip(lights.lights(time)) {
            let model = Mat4::from_translation(light.position)
                * Mat4::from_scale(Vec3::splat(MARKER_SCALE));
            binding.update(queue, model);
        }

        let slot = self.selected.and_then(|i| self.slots[i].as_ref());

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.1,
                        g: 0.1,
                        b: 0.1,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let Some(slot) = slot else {
            return;
        };

        pass.set_pipeline(&self.pbr.pipeline);
        pass.set_bind_group(0, &self.frame_bind, &[]);
        pass.set_bind_group(1, &slot.ibl_bind, &[]);
        pass.set_bind_group(2, &self.material_bind, &[]);

        pass.set_bind_group(3, &self.model_binding.bind_group, &[]);
        self.sphere.draw(&mut pass);

        for marker in &self.marker_bindings {
            pass.set_bind_group(3, &marker.bind_group, &[]);
            self.sphere.draw(&mut pass);
        }

        // Background last so the depth test rejects covered pixels
        pass.set_pipeline(&self.sky.pipeline);
        pass.set_bind_group(0, &self.frame_bind, &[]);
        pass.set_bind_group(1, &slot.sky_bind, &[]);
        self.cube.draw(&mut pass);
    }
}

fn create_depth(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Scene Depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
