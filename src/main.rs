//! PBR viewer demo
//!
//! Bakes every configured HDR environment at startup, then renders the
//! textured sphere under four orbiting lights. Keys 1..=N switch the
//! environment, left drag orbits the camera, scroll zooms, Escape
//! exits.

use ibl_viewer::resources::{MaterialPaths, MaterialTextures};
use ibl_viewer::scene::{LightRig, OrbitCamera, Projection};
use ibl_viewer::{GpuContext, IblBaker, SceneRenderer, ViewerConfig, Window};
use std::path::PathBuf;
use std::time::Instant;
use winit::{
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
};

fn config_from_args() -> ViewerConfig {
    let mut config = ViewerConfig {
        title: "IBL Viewer".to_string(),
        ..Default::default()
    };

    config.environment_paths = std::env::args().skip(1).map(PathBuf::from).collect();
    if config.environment_paths.is_empty() {
        config.environment_paths = vec![
            PathBuf::from("assets/environments/loft.hdr"),
            PathBuf::from("assets/environments/night.hdr"),
            PathBuf::from("assets/environments/field.hdr"),
        ];
    }
    config
}

fn material_paths() -> MaterialPaths {
    let base = PathBuf::from("assets/material");
    MaterialPaths {
        albedo: base.join("albedo.png"),
        metallic: base.join("metallic.png"),
        roughness: base.join("roughness.png"),
        normal: base.join("normal.png"),
        occlusion: base.join("ao.png"),
    }
}

fn main() {
    env_logger::init();

    let config = config_from_args();

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut window = Window::new(&event_loop, &config.title, config.width, config.height);

    let mut gpu = match GpuContext::new(window.window_arc(), config.vsync) {
        Ok(gpu) => gpu,
        Err(e) => {
            log::error!("GPU initialization failed: {}", e);
            std::process::exit(1);
        }
    };

    let mut baker = IblBaker::new(&gpu.device, &gpu.queue);
    let environments = baker.bake_all(&gpu.device, &gpu.queue, &config.environment_paths);
    let baked = environments.iter().filter(|e| e.is_some()).count();
    log::info!(
        "Baked {}/{} environments",
        baked,
        config.environment_paths.len()
    );

    let material = match MaterialTextures::load(&gpu.device, &gpu.queue, &material_paths()) {
        Ok(material) => material,
        Err(e) => {
            log::error!("Material load failed, using fallback maps: {}", e);
            MaterialTextures::fallback(&gpu.device, &gpu.queue)
        }
    };

    let (width, height) = gpu.surface_size();
    let mut renderer = SceneRenderer::new(
        &gpu.device,
        gpu.surface_format(),
        width,
        height,
        &material,
        environments,
        baker.brdf_lut(),
    );

    let mut camera = OrbitCamera::default();
    let mut projection = Projection::new(width, height);
    let lights = LightRig::default();

    let start = Instant::now();
    let mut dragging = false;
    let mut last_cursor: Option<(f64, f64)> = None;

    event_loop
        .run(move |event, elwt| match event {
            Event::AboutToWait => window.request_redraw(),
            Event::WindowEvent { event, .. } => {
                window.handle_event(&event);

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.state == ElementState::Pressed {
                            match event.physical_key {
                                PhysicalKey::Code(KeyCode::Escape) => elwt.exit(),
                                PhysicalKey::Code(KeyCode::Digit1) => {
                                    renderer.select_environment(0)
                                }
                                PhysicalKey::Code(KeyCode::Digit2) => {
                                    renderer.select_environment(1)
                                }
                                PhysicalKey::Code(KeyCode::Digit3) => {
                                    renderer.select_environment(2)
                                }
                                _ => {}
                            }
                        }
                    }
                    WindowEvent::MouseInput {
                        button: MouseButton::Left,
                        state,
                        ..
                    } => {
                        dragging = state == ElementState::Pressed;
                        if !dragging {
                            last_cursor = None;
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        if dragging {
                            if let Some((lx, ly)) = last_cursor {
                                camera.orbit(
                                    (position.x - lx) as f32,
                                    (position.y - ly) as f32,
                                );
                            }
                            last_cursor = Some((position.x, position.y));
                        }
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                        };
                        camera.zoom(scroll);
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some((w, h)) = window.take_resize() {
                            gpu.resize(w, h);
                            let (w, h) = gpu.surface_size();
                            renderer.resize(&gpu.device, w, h);
                            projection.set_aspect(w, h);
                        }

                        let frame = match gpu.begin_frame() {
                            Ok(frame) => frame,
                            Err(ibl_viewer::GpuError::SurfaceLost) => {
                                let (w, h) = gpu.surface_size();
                                gpu.resize(w, h);
                                return;
                            }
                            Err(ibl_viewer::GpuError::OutOfMemory) => {
                                log::error!("Out of GPU memory, exiting");
                                elwt.exit();
                                return;
                            }
                            Err(e) => {
                                log::warn!("Skipping frame: {}", e);
                                return;
                            }
                        };

                        let mut encoder = gpu.device.create_command_encoder(
                            &wgpu::CommandEncoderDescriptor {
                                label: Some("Frame Encoder"),
                            },
                        );
                        renderer.render(
                            &gpu.queue,
                            &mut encoder,
                            &frame.view,
                            &camera,
                            &projection,
                            &lights,
                            start.elapsed().as_secs_f32(),
                        );
                        gpu.queue.submit(Some(encoder.finish()));
                        frame.present();
                    }
                    _ => {}
                }
            }
            _ => {}
        })
        .expect("Event loop error");
}
