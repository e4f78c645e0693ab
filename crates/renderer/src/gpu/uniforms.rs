use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::runtime::TimeSample;

/// CPU mirror of the `FrameParams` std140 block declared in `compile.rs`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub time: f32,
    pub frame_index: f32,
}

impl FrameUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            resolution: [width as f32, height as f32],
            time: 0.0,
            frame_index: 0.0,
        }
    }

    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.resolution = [width as f32, height as f32];
    }

    pub fn update(&mut self, sample: TimeSample, view_proj: Mat4) {
        self.view_proj = view_proj.to_cols_array_2d();
        self.time = sample.seconds;
        self.frame_index = sample.frame_index as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_std140_block() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 80);
        assert_eq!(std::mem::offset_of!(FrameUniforms, resolution), 64);
        assert_eq!(std::mem::offset_of!(FrameUniforms, time), 72);
        assert_eq!(std::mem::offset_of!(FrameUniforms, frame_index), 76);
    }

    #[test]
    fn update_copies_sample_and_matrix() {
        let mut uniforms = FrameUniforms::new(640, 480);
        let matrix = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        uniforms.update(
            TimeSample {
                seconds: 0.5,
                frame_index: 50,
            },
            matrix,
        );
        assert_eq!(uniforms.time, 0.5);
        assert_eq!(uniforms.frame_index, 50.0);
        assert_eq!(uniforms.view_proj[3], [1.0, 2.0, 3.0, 1.0]);
        uniforms.set_resolution(10, 20);
        assert_eq!(uniforms.resolution, [10.0, 20.0]);
    }
}
