//! Renderer crate for the glitch sphere.
//!
//! The crate puts the `glitchfx` colour pipeline onto a UV sphere, either live
//! in a window through `wgpu` or offline on the CPU for still frames. The
//! overall flow is:
//!
//! ```text
//!   CLI / glitchsphere
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ Animate ──▶ WindowState ──▶ winit event loop ──▶ GpuState::render()
//!          │                                             │
//!          │                                             └─▶ FrameUniforms ─▶ GPU UBO
//!          └──────▶ Export  ──▶ SoftwareRenderer ──▶ glitchfx::shade per pixel ──▶ PNG
//! ```
//!
//! Both paths share the same camera and sphere parameterisation, and the
//! fragment shader is generated from the constants in `glitchfx::params`, so
//! a still export matches what the window shows for the same time value.

mod camera;
mod compile;
mod gpu;
mod mesh;
mod runtime;
mod software;
mod types;
mod window;

use anyhow::Result;

pub use camera::{Camera, Ray};
pub use mesh::{sphere_point, surface_uv, SphereGeometry, SphereVertex};
pub use runtime::{
    time_source_for_policy, BoxedTimeSource, FixedTimeSource, FrameScheduler,
    FrameStepTimeSource, RenderPolicy, TimeSample, TimeSource,
};
pub use software::{SoftwareRenderer, MAX_EXPORT_DIMENSION};
pub use types::{AdapterProfile, Antialiasing, ColorSpaceMode, RendererConfig, SceneSettings};

/// High-level entry point that owns the chosen configuration.
///
/// `Renderer` selects the presentation path from the [`RenderPolicy`] and
/// forwards the request.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Runs the animated window, or writes a single still frame.
    ///
    /// Returns an error if the window or GPU fails to initialise, or if the
    /// still frame cannot be written.
    pub fn run(&mut self) -> Result<()> {
        match &self.config.policy {
            RenderPolicy::Animate { .. } => window::run_window(self.config.clone()),
            RenderPolicy::Export { path, .. } => {
                let sample =
                    time_source_for_policy(&self.config.policy, self.config.time_step).sample();
                let renderer = SoftwareRenderer::new(self.config.scene);
                renderer.export_png(path, self.config.surface_size, sample.seconds)?;
                Ok(())
            }
        }
    }
}
