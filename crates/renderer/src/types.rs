use crate::runtime::RenderPolicy;

/// Output color handling for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpaceMode {
    /// Match the WebGL look: shader output written to a gamma-encoded swapchain.
    #[default]
    Auto,
    /// Treat shader outputs as gamma-encoded; use non-sRGB surfaces.
    Gamma,
    /// Treat shader outputs as linear and use sRGB swapchains for conversion.
    Linear,
}

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self::Auto
    }
}

/// Sphere tessellation and placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSettings {
    pub sphere_radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance of the camera from the sphere centre along +Z.
    pub camera_distance: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            sphere_radius: 2.0,
            width_segments: 64,
            height_segments: 64,
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_distance: 5.0,
        }
    }
}

/// Summary of the GPU adapter picked for the window.
#[derive(Debug, Clone)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
}

impl AdapterProfile {
    pub(crate) fn from_wgpu(info: &wgpu::AdapterInfo) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
        }
    }

    /// Software rasterizers (llvmpipe, WARP, ...) report themselves as CPU devices.
    pub fn is_software(&self) -> bool {
        matches!(self.device_type, wgpu::DeviceType::Cpu)
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors CLI flags and tells the renderer how large the
/// target surface should be, how fast time advances, and whether to animate
/// in a window or export a single frame.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window or image size in physical pixels.
    pub surface_size: (u32, u32),
    /// Time added per rendered frame.
    pub time_step: f32,
    /// Anti-aliasing mode requested by the caller.
    pub antialiasing: Antialiasing,
    /// Desired color handling for the swapchain.
    pub color_space: ColorSpaceMode,
    /// Geometry and camera placement.
    pub scene: SceneSettings,
    /// High-level render behaviour requested by the caller.
    pub policy: RenderPolicy,
}

impl Default for RendererConfig {
    /// Provides a 1280x720 animated window.
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            time_step: glitchfx::params::DEFAULT_TIME_STEP,
            antialiasing: Antialiasing::default(),
            color_space: ColorSpaceMode::default(),
            scene: SceneSettings::default(),
            policy: RenderPolicy::default(),
        }
    }
}
