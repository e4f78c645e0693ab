//! UV sphere generation.
//!
//! Vertices are laid out on a `(width_segments + 1) x (height_segments + 1)`
//! grid so the texture seam gets duplicated vertices and `uv` runs over the
//! full `[0, 1]` range. The surface coordinate fed to the shader is
//! `(u, 1 - v)`: `u` follows longitude, `v` runs from the north pole
//! (`uv.y = 1`) to the south pole (`uv.y = 0`).

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Interleaved vertex uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl SphereVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle list for a sphere centred on the origin.
#[derive(Debug, Clone)]
pub struct SphereGeometry {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereGeometry {
    /// Builds the sphere. Segment counts are clamped to at least 3 around and 2 down.
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let row_len = width_segments + 1;
        let mut vertices = Vec::with_capacity((row_len * (height_segments + 1)) as usize);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            // Pole rows collapse to a point; nudge their u to the centre of each fan.
            let u_offset = if iy == 0 {
                0.5 / width_segments as f32
            } else if iy == height_segments {
                -0.5 / width_segments as f32
            } else {
                0.0
            };

            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let position = sphere_point(radius, u, v);
                vertices.push(SphereVertex {
                    position: position.to_array(),
                    normal: position.normalize_or_zero().to_array(),
                    uv: [u + u_offset, 1.0 - v],
                });
            }
        }

        let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row_len + ix + 1;
                let b = iy * row_len + ix;
                let c = (iy + 1) * row_len + ix;
                let d = (iy + 1) * row_len + ix + 1;

                // The top and bottom rows would produce zero-area triangles at the poles.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            radius,
            width_segments,
            height_segments,
            vertices,
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Position of the grid sample `(u, v)` on a sphere of `radius`.
pub fn sphere_point(radius: f32, u: f32, v: f32) -> Vec3 {
    let phi = u * TAU;
    let theta = v * PI;
    Vec3::new(
        -radius * phi.cos() * theta.sin(),
        radius * theta.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Inverse of the vertex mapping: the surface coordinate under `point`.
///
/// `point` only needs to lie on a ray from the centre; it is normalised first.
pub fn surface_uv(point: Vec3) -> Vec2 {
    let direction = point.normalize_or_zero();
    let theta = direction.y.clamp(-1.0, 1.0).acos();
    let mut phi = direction.z.atan2(-direction.x);
    if phi < 0.0 {
        phi += TAU;
    }
    Vec2::new(phi / TAU, 1.0 - theta / PI)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn vertex_and_index_counts() {
        let sphere = SphereGeometry::new(2.0, 64, 64);
        assert_eq!(sphere.vertices.len(), 65 * 65);
        // Every quad is two triangles except the single fans at each pole.
        assert_eq!(sphere.triangle_count(), 2 * 64 * 63);
        let max_index = *sphere.indices.iter().max().unwrap();
        assert!((max_index as usize) < sphere.vertices.len());
    }

    #[test]
    fn segments_are_clamped() {
        let sphere = SphereGeometry::new(1.0, 1, 1);
        assert_eq!(sphere.width_segments, 3);
        assert_eq!(sphere.height_segments, 2);
        assert_eq!(sphere.vertices.len(), 4 * 3);
    }

    #[test]
    fn first_row_is_north_pole() {
        let sphere = SphereGeometry::new(2.0, 8, 4);
        for vertex in &sphere.vertices[..9] {
            assert_abs_diff_eq!(vertex.position[0], 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(vertex.position[1], 2.0, epsilon = 1e-6);
            assert_abs_diff_eq!(vertex.uv[1], 1.0, epsilon = 1e-6);
        }
        let south = sphere.vertices.last().unwrap();
        assert_abs_diff_eq!(south.position[1], -2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(south.uv[1], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn vertices_sit_on_the_radius_with_unit_normals() {
        let sphere = SphereGeometry::new(2.0, 16, 12);
        for vertex in &sphere.vertices {
            let position = Vec3::from(vertex.position);
            assert_abs_diff_eq!(position.length(), 2.0, epsilon = 1e-5);
            assert_abs_diff_eq!(Vec3::from(vertex.normal).length(), 1.0, epsilon = 1e-5);
            assert!((0.0..=1.0).contains(&vertex.uv[1]));
        }
    }

    #[test]
    fn surface_uv_inverts_vertex_mapping() {
        let sphere = SphereGeometry::new(2.0, 16, 12);
        let row_len = 17;
        // Skip the pole rows and the seam column where u wraps from 1 back to 0.
        for iy in 1..12 {
            for ix in 1..16 {
                let vertex = sphere.vertices[iy * row_len + ix];
                let uv = surface_uv(Vec3::from(vertex.position));
                assert_abs_diff_eq!(uv.x, vertex.uv[0], epsilon = 1e-5);
                assert_abs_diff_eq!(uv.y, vertex.uv[1], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn point_facing_the_camera_maps_to_quarter_turn() {
        // +Z is phi = pi/2, the middle of the equator row.
        let uv = surface_uv(Vec3::new(0.0, 0.0, 2.0));
        assert_abs_diff_eq!(uv.x, 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(uv.y, 0.5, epsilon = 1e-6);
    }
}
