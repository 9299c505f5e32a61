//! PBR viewer with GPU-baked image-based lighting
//!
//! Loads equirectangular HDR environments and bakes each one into the
//! three lighting resources required by the split-sum approximation:
//! - an environment cubemap (direct projection)
//! - a diffuse irradiance cubemap (cosine-weighted convolution)
//! - a specular prefiltered cubemap (roughness-indexed mip chain)
//!
//! plus a single shared BRDF integration lookup texture. The baked maps
//! feed a forward PBR pass with an orbiting camera and a skybox.

pub mod gpu;
pub mod ibl;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod window;

pub use gpu::{GpuContext, GpuError};
pub use ibl::{EnvironmentMaps, IblBaker};
pub use renderer::SceneRenderer;
pub use window::Window;

/// Configuration for the viewer application
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    /// Enable vsync
    pub vsync: bool,
    /// Equirectangular HDR environment sources, selectable with keys 1..=N
    pub environment_paths: Vec<std::path::PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "PBR Viewer".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            environment_paths: Vec::new(),
        }
    }
}
