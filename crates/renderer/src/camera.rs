use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::types::SceneSettings;

/// Perspective camera on the +Z axis looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(scene: &SceneSettings, width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, scene.camera_distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: scene.fov_y_degrees.to_radians(),
            aspect: 1.0,
            near: scene.near,
            far: scene.far,
        };
        camera.set_aspect(width, height);
        camera
    }

    /// Updates the aspect ratio after a resize. Zero-sized surfaces are ignored
    /// so a minimised window keeps its last projection.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Right-handed projection with wgpu's `0..1` depth range.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World-space ray through a normalised device coordinate (`-1..1`, +Y up).
    pub fn primary_ray(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let far = inverse * ndc.extend(1.0).extend(1.0);
        let far = far.xyz() / far.w;
        Ray {
            origin: self.position,
            direction: (far - self.position).normalize(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Nearest positive hit distance against a sphere at the origin.
    pub fn intersect_sphere(&self, radius: f32) -> Option<f32> {
        let b = self.origin.dot(self.direction);
        let c = self.origin.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = -b - root;
        if near > 0.0 {
            return Some(near);
        }
        let far = -b + root;
        (far > 0.0).then_some(far)
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}
