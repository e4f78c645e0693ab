//! CPU rasterizer for still frames.
//!
//! Each pixel casts a ray from the camera, finds the sphere surface
//! coordinate it lands on and runs it through [`glitchfx::shade`]. Pixels are
//! independent, so rows are shaded in parallel.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use image::RgbaImage;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::camera::Camera;
use crate::mesh::surface_uv;
use crate::types::SceneSettings;

const BACKGROUND: [u8; 4] = [0, 0, 0, 255];

/// Largest still-frame edge, matching the common GPU texture limit.
pub const MAX_EXPORT_DIMENSION: u32 = 8192;

/// Renders the sphere scene without touching the GPU.
#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    scene: SceneSettings,
}

impl SoftwareRenderer {
    pub fn new(scene: SceneSettings) -> Self {
        Self { scene }
    }

    /// Surface coordinate under pixel `(x, y)`, or `None` for background.
    pub fn surface_at(
        &self,
        camera: &Camera,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Option<Vec2> {
        // Sample pixel centres; image rows grow downwards, NDC grows upwards.
        let ndc = Vec2::new(
            (x as f32 + 0.5) / width as f32 * 2.0 - 1.0,
            1.0 - (y as f32 + 0.5) / height as f32 * 2.0,
        );
        let ray = camera.primary_ray(ndc);
        let distance = ray.intersect_sphere(self.scene.sphere_radius)?;
        Some(surface_uv(ray.at(distance)))
    }

    pub fn render(&self, width: u32, height: u32, time: f32) -> RgbaImage {
        let width = width.max(1);
        let height = height.max(1);
        let camera = Camera::new(&self.scene, width, height);
        let mut image = RgbaImage::new(width, height);

        image
            .par_chunks_mut(width as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let rgba = self
                        .surface_at(&camera, x as u32, y as u32, width, height)
                        .map(|uv| glitchfx::shade(uv, time).to_rgba8())
                        .unwrap_or(BACKGROUND);
                    pixel.copy_from_slice(&rgba);
                }
            });

        debug!(
            width,
            height,
            time,
            glitching = glitchfx::glitch::is_glitch_frame(time),
            "software frame shaded"
        );
        image
    }

    /// Renders a frame at `time` and writes it to `path` as PNG.
    pub fn export_png(&self, path: &Path, size: (u32, u32), time: f32) -> Result<PathBuf> {
        if size.0 > MAX_EXPORT_DIMENSION || size.1 > MAX_EXPORT_DIMENSION {
            bail!(
                "still frame size {}x{} exceeds the {MAX_EXPORT_DIMENSION} pixel limit",
                size.0,
                size.1
            );
        }
        let image = self.render(size.0, size.1, time);
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to prepare export directory {}", parent.display())
            })?;
        }
        image
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("failed to write still frame to {}", path.display()))?;
        info!(
            path = %path.display(),
            width = size.0,
            height = size.1,
            time,
            "exported still frame"
        );
        Ok(path.to_path_buf())
    }
}
